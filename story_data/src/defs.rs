use std::borrow::Cow;

use thiserror::Error;

use crate::language::{CapacityError, LanguageTable, MAX_LANGUAGES};
use crate::table::HashTable;

/// Maximum number of choices a single scene can offer.
pub const MAX_CHOICES: usize = 8;

/// Failure to store text in a language slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("language slot {index} already holds text")]
    Occupied { index: usize },
    #[error("language slot {index} is out of range")]
    OutOfRange { index: usize },
}

/// One text slot per language index. An empty slot means no localization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Localized<'src> {
    slots: [Option<&'src [u8]>; MAX_LANGUAGES],
}

impl<'src> Localized<'src> {
    pub fn get(&self, language: usize) -> Option<&'src [u8]> {
        self.slots.get(language).copied().flatten()
    }

    /// Fill the slot for `language`. Empty text leaves the slot empty.
    ///
    /// # Errors
    /// Returns [`SlotError::Occupied`] when the slot already holds text.
    pub fn set(&mut self, language: usize, text: &'src [u8]) -> Result<(), SlotError> {
        let slot = self
            .slots
            .get_mut(language)
            .ok_or(SlotError::OutOfRange { index: language })?;
        if slot.is_some() {
            return Err(SlotError::Occupied { index: language });
        }
        if !text.is_empty() {
            *slot = Some(text);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// An edge from a scene to another label, with its own localized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<'src> {
    pub link: &'src [u8],
    pub text: Localized<'src>,
}

impl<'src> Choice<'src> {
    pub fn new(link: &'src [u8]) -> Self {
        Self {
            link,
            text: Localized::default(),
        }
    }
}

/// A node in the story graph. `Scene::default()` is the placeholder stored for
/// a label before its body is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene<'src> {
    pub text: Localized<'src>,
    choices: Vec<Choice<'src>>,
}

impl<'src> Scene<'src> {
    pub fn choices(&self) -> &[Choice<'src>] {
        &self.choices
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    /// Append a choice and hand back a handle to fill its text.
    ///
    /// # Errors
    /// Returns a [`CapacityError`] once [`MAX_CHOICES`] choices exist.
    pub fn push_choice(&mut self, choice: Choice<'src>) -> Result<&mut Choice<'src>, CapacityError> {
        if self.choices.len() >= MAX_CHOICES {
            return Err(CapacityError {
                kind: "choice",
                capacity: MAX_CHOICES,
            });
        }
        self.choices.push(choice);
        let last = self.choices.len() - 1;
        Ok(&mut self.choices[last])
    }

    /// Choice `index` pointed at `link`. An existing choice keeps its text, so
    /// a label defined twice fills the same choice slots again; `index` equal
    /// to the current count appends.
    ///
    /// # Errors
    /// Returns a [`CapacityError`] when appending past [`MAX_CHOICES`].
    pub fn choice_slot(&mut self, index: usize, link: &'src [u8]) -> Result<&mut Choice<'src>, CapacityError> {
        if index < self.choices.len() {
            let choice = &mut self.choices[index];
            choice.link = link;
            return Ok(choice);
        }
        self.push_choice(Choice::new(link))
    }

    pub fn is_placeholder(&self) -> bool {
        self.text.is_empty() && self.choices.is_empty()
    }
}

/// A parsed story, borrowing every label and text from the source buffer.
#[derive(Debug, Clone)]
pub struct Story<'src> {
    pub scenes: HashTable<'src, Scene<'src>>,
    pub languages: LanguageTable<'src>,
    pub start: &'src [u8],
    pub quit: &'src [u8],
}

impl<'src> Story<'src> {
    pub fn scene(&self, label: &[u8]) -> Option<&Scene<'src>> {
        self.scenes.get(label)
    }

    pub fn is_quit(&self, label: &[u8]) -> bool {
        label == self.quit
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn choice_count(&self) -> usize {
        self.scenes.iter().map(|(_, scene)| scene.choice_count()).sum()
    }
}

/// Render borrowed bytes for humans; invalid UTF-8 is replaced, not rejected.
pub fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}
