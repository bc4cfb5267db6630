//! Header stage: `languages:`, `start:` and `quit:` in any order.

use log::debug;
use story_data::{HashTable, LanguageTable, Scene, lossy};

use super::ParseError;
use super::helpers::{Cursor, is_blank, is_comment, is_label, strip_label, trim};

/// Labels named by the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Header<'src> {
    pub start: &'src [u8],
    pub quit: &'src [u8],
}

/// Read lines until all three header sections have been seen.
///
/// The quit label is registered immediately with a placeholder scene.
pub(super) fn parse_header<'src>(
    cursor: &mut Cursor<'src>,
    languages: &mut LanguageTable<'src>,
    scenes: &mut HashTable<'src, Scene<'src>>,
) -> Result<Header<'src>, ParseError> {
    let mut has_languages = false;
    let mut start = None;
    let mut quit = None;

    while let Some(line) = cursor.next() {
        let text = trim(line.text);

        if text.starts_with(b"languages:") {
            parse_languages(cursor, languages)?;
            has_languages = true;
        } else if let Some(value) = text.strip_prefix(b"start:") {
            let label = trim(value);
            if !is_label(label) {
                return Err(ParseError::InvalidStartLabel { line: line.number });
            }
            start = Some(strip_label(label));
        } else if let Some(value) = text.strip_prefix(b"quit:") {
            let label = trim(value);
            if !is_label(label) {
                return Err(ParseError::InvalidQuitLabel { line: line.number });
            }
            let label = strip_label(label);
            scenes.put(label, Scene::default())?;
            quit = Some(label);
        }

        if has_languages && start.is_some() && quit.is_some() {
            break;
        }
    }

    if !has_languages {
        return Err(ParseError::MissingLanguages);
    }
    let start = start.ok_or(ParseError::MissingStart)?;
    let quit = quit.ok_or(ParseError::MissingQuit)?;
    debug!("header: {} languages, header ends at line {}", languages.len(), cursor.line_number());
    Ok(Header { start, quit })
}

/// Language codes, one per line, until a blank line. Each code is declared once.
fn parse_languages<'src>(cursor: &mut Cursor<'src>, languages: &mut LanguageTable<'src>) -> Result<(), ParseError> {
    while let Some(line) = cursor.next() {
        if is_blank(line.text) {
            break;
        }
        if is_comment(line.text) {
            continue;
        }
        let code = trim(line.text);
        if languages.index_of(code).is_some() {
            return Err(ParseError::RepeatedLanguage {
                line: line.number,
                code: lossy(code).into_owned(),
            });
        }
        languages
            .add(code)
            .map_err(|_| ParseError::TooManyLanguages { line: line.number })?;
    }
    Ok(())
}
