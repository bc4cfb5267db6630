//! Shared data model for storyc documents.

pub mod defs;
pub mod language;
pub mod table;
pub mod validate;

pub use defs::*;
pub use language::{CapacityError, LanguageTable, MAX_LANGUAGES};
pub use table::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, HashFn, HashTable, TableError, djb2, fnv1a};
pub use validate::{ValidationError, validate_story};
