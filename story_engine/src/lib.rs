#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const STORYC_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod command;
pub mod export;
pub mod loader;
pub mod repl;
pub mod style;

pub use export::{ExportFormat, export_file, resolve_language, write_export};
pub use loader::{compile_story, load_source};
pub use repl::{Session, run_story};
