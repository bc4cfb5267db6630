use std::io::{self, Write};

use story_data::Story;

/// Twine passage name for a label: every `_` becomes a space.
pub fn passage_name(label: &[u8]) -> Vec<u8> {
    label.iter().map(|&b| if b == b'_' { b' ' } else { b }).collect()
}

/// Twee passages in one language.
///
/// The quit scene gets no passage and choices leading to it are left out, so
/// a story's final choice does not appear in the output. Missing text is
/// written as an empty string.
///
/// # Errors
/// Propagates write failures from `out`.
pub fn export_twee<W: Write>(story: &Story<'_>, language: usize, out: &mut W) -> io::Result<()> {
    for (label, scene) in story.scenes.iter() {
        if story.is_quit(label) {
            continue;
        }

        out.write_all(b":: ")?;
        out.write_all(&passage_name(label))?;
        out.write_all(b"\n")?;
        out.write_all(scene.text.get(language).unwrap_or_default())?;
        out.write_all(b"\n")?;

        for choice in scene.choices() {
            if story.is_quit(choice.link) {
                continue;
            }
            out.write_all(b"[[")?;
            out.write_all(choice.text.get(language).unwrap_or_default())?;
            out.write_all(b"->")?;
            out.write_all(&passage_name(choice.link))?;
            out.write_all(b"]]\n")?;
        }

        out.write_all(b"\n")?;
    }
    out.flush()
}
