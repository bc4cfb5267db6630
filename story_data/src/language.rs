//! Declared language codes.
//!
//! The position of a code in the [`LanguageTable`] is its language index: the
//! slot used to address localized text in every scene and choice, and the
//! order in which exporters enumerate languages.

use thiserror::Error;

/// Maximum number of languages a story may declare.
pub const MAX_LANGUAGES: usize = 8;

/// Raised when a bounded collection would grow past its fixed capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} capacity of {capacity} exceeded")]
pub struct CapacityError {
    pub kind: &'static str,
    pub capacity: usize,
}

/// Ordered, bounded list of language codes borrowed from the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageTable<'src> {
    codes: Vec<&'src [u8]>,
}

impl<'src> LanguageTable<'src> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a code and return its language index.
    ///
    /// # Errors
    /// Returns a [`CapacityError`] once [`MAX_LANGUAGES`] codes are declared.
    pub fn add(&mut self, code: &'src [u8]) -> Result<usize, CapacityError> {
        if self.codes.len() >= MAX_LANGUAGES {
            return Err(CapacityError {
                kind: "language",
                capacity: MAX_LANGUAGES,
            });
        }
        self.codes.push(code);
        Ok(self.codes.len() - 1)
    }

    /// Linear search for the first exact match.
    pub fn index_of(&self, code: &[u8]) -> Option<usize> {
        self.codes.iter().position(|c| *c == code)
    }

    pub fn get(&self, index: usize) -> Option<&'src [u8]> {
        self.codes.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &'src [u8]> + '_ {
        self.codes.iter().copied()
    }
}
