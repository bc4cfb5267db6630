//! File-level export: compile a story document and write one output format.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use story_data::{Story, lossy};
use story_script::ExportTarget;

use crate::loader::{compile_story, load_source};

/// Output format requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat<'a> {
    Graph,
    /// Twee in the language with this code.
    Twee { language: &'a str },
    C,
}

/// Compile `input` and write it to `output` in `format`.
///
/// The output file is only created once the document has compiled, so a
/// failed compilation leaves no file behind.
///
/// # Errors
/// Fails on unreadable input, parse or validation errors, an undeclared twee
/// language, or an unwritable output.
pub fn export_file(input: &Path, output: &Path, format: ExportFormat<'_>) -> Result<()> {
    let src = load_source(input)?;
    let story = compile_story(&src, input)?;
    let target = match format {
        ExportFormat::Graph => ExportTarget::Graph,
        ExportFormat::C => ExportTarget::C,
        ExportFormat::Twee { language } => ExportTarget::Twee {
            language: resolve_language(&story, language, input)?,
        },
    };
    write_export(&story, target, output)
}

/// Index of the language `code` declared in the document read from `path`.
///
/// # Errors
/// Fails when the document does not declare `code`.
pub fn resolve_language(story: &Story<'_>, code: &str, path: &Path) -> Result<usize> {
    story.languages.index_of(code.as_bytes()).with_context(|| {
        let declared = story
            .languages
            .iter()
            .map(|c| lossy(c).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "language '{code}' is not declared in {} (declared: {declared})",
            path.display()
        )
    })
}

/// Write an already compiled story to `output`.
///
/// # Errors
/// Fails when `output` cannot be created or written.
pub fn write_export(story: &Story<'_>, target: ExportTarget, output: &Path) -> Result<()> {
    let file = File::create(output).with_context(|| format!("while creating {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    target
        .write(story, &mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("while writing {}", output.display()))?;
    info!("{target:?} export written to {}", output.display());
    Ok(())
}
