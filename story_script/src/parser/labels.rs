//! Label pre-registration: makes forward references resolvable.

use log::debug;
use story_data::{HashTable, Scene};

use super::ParseError;
use super::helpers::{Cursor, is_label, strip_label, trim};

/// Scan the whole document from its first byte and register every label line
/// with a placeholder scene. Labels already present are left untouched.
pub(super) fn register_labels<'src>(
    src: &'src [u8],
    scenes: &mut HashTable<'src, Scene<'src>>,
) -> Result<(), ParseError> {
    for line in Cursor::new(src) {
        let text = trim(line.text);
        if !is_label(text) {
            continue;
        }
        let label = strip_label(text);
        if !scenes.contains_key(label) {
            scenes.put(label, Scene::default())?;
        }
    }
    debug!("registered {} labels", scenes.len());
    Ok(())
}
