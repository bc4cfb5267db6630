//! story_script: compiler for multilingual branching stories.
//!
//! A document declares its languages and its start and quit labels, then a
//! sequence of labelled scenes:
//!
//! ```text
//! languages:
//! en
//! fr
//!
//! start: [intro]
//! quit: [end]
//!
//! [intro]
//! en: Hello
//! fr: Bonjour
//! 1. [end]
//! en: Leave
//! fr: Partir
//! ```
//!
//! [`parse_story`] turns the document into a [`Story`](story_data::Story)
//! that borrows from the source buffer. The [`export`] module serializes a
//! finished story as a Graphviz graph, a Twine `.twee` file or a standalone
//! C program.

mod parser;
pub mod export;

pub use export::{ExportTarget, export_c, export_graph, export_twee};
pub use parser::{ParseError, parse_story};
