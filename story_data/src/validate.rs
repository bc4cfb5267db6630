use std::fmt;

use crate::*;

/// Broken invariant found in a parsed [`Story`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingReference { kind: &'static str, id: String, context: String },
    DuplicateCode { kind: &'static str, id: String, first: usize, again: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::DuplicateCode { kind, id, first, again } => {
                write!(f, "{kind} '{id}' declared at index {first} and again at {again}")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check that the start and quit labels exist, every choice resolves and no
/// language code is declared twice.
///
/// The parser already enforces these rules; this re-checks a finished story,
/// including ones assembled by hand.
///
/// ```
/// use story_data::{Choice, HashTable, LanguageTable, Scene, Story, validate_story};
///
/// let mut scenes = HashTable::new();
/// let mut intro = Scene::default();
/// intro.push_choice(Choice::new(b"end")).unwrap();
/// scenes.put(b"intro", intro).unwrap();
/// scenes.put(b"end", Scene::default()).unwrap();
///
/// let story = Story {
///     scenes,
///     languages: LanguageTable::new(),
///     start: b"intro",
///     quit: b"end",
/// };
/// assert!(validate_story(&story).is_empty());
/// ```
pub fn validate_story(story: &Story<'_>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_label(story, story.start, "story start".to_string(), &mut errors);
    check_label(story, story.quit, "story quit".to_string(), &mut errors);

    // A repeated code shadows its later slot and repeats a C enum constant.
    for (again, code) in story.languages.iter().enumerate() {
        if let Some(first) = story.languages.index_of(code)
            && first != again
        {
            errors.push(ValidationError::DuplicateCode {
                kind: "language",
                id: lossy(code).into_owned(),
                first,
                again,
            });
        }
    }

    for (label, scene) in story.scenes.iter() {
        for (n, choice) in scene.choices().iter().enumerate() {
            check_label(
                story,
                choice.link,
                format!("scene '{}' choice {}", lossy(label), n + 1),
                &mut errors,
            );
        }
    }

    errors
}

fn check_label(story: &Story<'_>, label: &[u8], context: String, errors: &mut Vec<ValidationError>) {
    if !story.scenes.contains_key(label) {
        errors.push(ValidationError::MissingReference {
            kind: "label",
            id: lossy(label).into_owned(),
            context,
        });
    }
}
