//! Loader utilities for turning a story file into a validated [`Story`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;
use story_data::Story;
use story_script::parse_story;

/// Read the raw bytes of a story document.
///
/// # Errors
/// Fails when the file cannot be read.
pub fn load_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("while reading story file {}", path.display()))
}

/// Parse and validate `src`, which was read from `path`.
///
/// # Errors
/// Returns the first parse error, or every validation failure in one message.
pub fn compile_story<'src>(src: &'src [u8], path: &Path) -> Result<Story<'src>> {
    let story = parse_story(src).with_context(|| format!("while parsing {}", path.display()))?;
    validate(&story).with_context(|| format!("while validating {}", path.display()))?;

    info!("{} languages declared in {}", story.languages.len(), path.display());
    info!("{} scenes added to story", story.scene_count());
    info!("{} choices added to story", story.choice_count());
    Ok(story)
}

/// Validate the parsed story and return a single aggregated error.
fn validate(story: &Story<'_>) -> Result<()> {
    let errors = story_data::validate_story(story);
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .into_iter()
        .map(|err| format!("- {err}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("story validation failed:\n{details}");
}
