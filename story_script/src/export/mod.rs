//! Serializers for a finished [`Story`].
//!
//! Every exporter reads the story without mutating it and walks the label
//! table in slot order, so output is deterministic for a given document.

use std::io::{self, Write};

use story_data::Story;

mod c_program;
mod graph;
mod twee;

pub use c_program::{escape_c_string, export_c, language_identifier, scene_identifier};
pub use graph::export_graph;
pub use twee::{export_twee, passage_name};

/// Output format selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    /// Graphviz DOT edges.
    Graph,
    /// Twine `.twee` passages in one language, by language index.
    Twee { language: usize },
    /// Standalone C program.
    C,
}

impl ExportTarget {
    /// Write `story` in this format.
    ///
    /// # Errors
    /// Propagates write failures from `out`.
    pub fn write<W: Write>(self, story: &Story<'_>, out: &mut W) -> io::Result<()> {
        match self {
            ExportTarget::Graph => export_graph(story, out),
            ExportTarget::Twee { language } => export_twee(story, language, out),
            ExportTarget::C => export_c(story, out),
        }
    }

    /// Render into memory.
    ///
    /// # Errors
    /// Cannot fail in practice; writing to a `Vec` does not error.
    pub fn render(self, story: &Story<'_>) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(story, &mut out)?;
        Ok(out)
    }
}
