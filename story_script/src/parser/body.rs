//! Body stage: one label block per iteration.
//!
//! A block is a label line, its text lines, a blank line, then choices. Each
//! choice is a `N. [target]` line followed by its text lines and ends at a
//! blank line; a blank line where a choice line is expected ends the block.
//! Every other line inside a block must be a text or choice line.

use story_data::{HashTable, LanguageTable, Localized, Scene, lossy};

use super::ParseError;
use super::helpers::{
    Cursor, Line, PARAGRAPH_DELIMITER, is_blank, is_comment, is_label, split_once, strip_label, trim, trim_start,
};

/// What a line inside a block turned out to be.
enum Step<'src> {
    Content(Line<'src>),
    Skip,
    End,
}

/// Classify the next line: end of input and blank lines close the phase.
fn next_step<'src>(cursor: &mut Cursor<'src>) -> Step<'src> {
    let Some(line) = cursor.next() else {
        return Step::End;
    };
    if is_blank(line.text) {
        return Step::End;
    }
    if is_comment(line.text) {
        return Step::Skip;
    }
    Step::Content(line)
}

pub(super) fn parse_body<'src>(
    src: &'src [u8],
    cursor: &mut Cursor<'src>,
    languages: &LanguageTable<'src>,
    scenes: &mut HashTable<'src, Scene<'src>>,
) -> Result<(), ParseError> {
    while let Some(line) = cursor.next() {
        if is_blank(line.text) || is_comment(line.text) {
            continue;
        }
        let text = trim(line.text);
        if !is_label(text) {
            return Err(ParseError::InvalidLabel { line: line.number });
        }
        let label = strip_label(text);

        // Work on a detached copy so choice targets can be looked up in the
        // table while the scene is being filled.
        let mut scene = scenes
            .get_mut(label)
            .map(std::mem::take)
            .ok_or_else(|| ParseError::UndefinedLabel {
                line: line.number,
                label: lossy(label).into_owned(),
            })?;

        parse_scene_text(src, cursor, languages, &mut scene)?;
        parse_choices(cursor, languages, scenes, &mut scene)?;

        if let Some(slot) = scenes.get_mut(label) {
            *slot = scene;
        }
    }
    Ok(())
}

fn parse_scene_text<'src>(
    src: &'src [u8],
    cursor: &mut Cursor<'src>,
    languages: &LanguageTable<'src>,
    scene: &mut Scene<'src>,
) -> Result<(), ParseError> {
    loop {
        let line = match next_step(cursor) {
            Step::Content(line) => line,
            Step::Skip => continue,
            Step::End => return Ok(()),
        };
        let (code, value) = split_once(line.text, b':').ok_or(ParseError::InvalidText { line: line.number })?;

        let mut value = trim(value);
        let mut at = line.number;
        if value.is_empty() {
            (value, at) = parse_paragraph(src, cursor, line.number)?;
        }

        let index = language_index(languages, code, at)?;
        scene
            .text
            .set(index, value)
            .map_err(|_| ParseError::DuplicateLanguage { line: at })?;
    }
}

/// Text between the next two `~~~` lines, trimmed. Returns the text and the
/// line number of the closing delimiter.
fn parse_paragraph<'src>(
    src: &'src [u8],
    cursor: &mut Cursor<'src>,
    opened_at: usize,
) -> Result<(&'src [u8], usize), ParseError> {
    let mut body_start = None;
    for line in cursor.by_ref() {
        if trim(line.text) != PARAGRAPH_DELIMITER {
            continue;
        }
        let delimiter_at = line.offset + (line.text.len() - trim_start(line.text).len());
        match body_start {
            None => body_start = Some(delimiter_at + PARAGRAPH_DELIMITER.len()),
            Some(start) => return Ok((trim(&src[start..delimiter_at]), line.number)),
        }
    }
    Err(ParseError::InvalidParagraph { line: opened_at })
}

fn parse_choices<'src>(
    cursor: &mut Cursor<'src>,
    languages: &LanguageTable<'src>,
    scenes: &HashTable<'src, Scene<'src>>,
    scene: &mut Scene<'src>,
) -> Result<(), ParseError> {
    // Restarts at 0 in every block, so a redefined label refills its choices.
    let mut index = 0;
    loop {
        let line = match next_step(cursor) {
            Step::Content(line) => line,
            Step::Skip => continue,
            Step::End => return Ok(()),
        };
        let (_, target) = split_once(line.text, b'.').ok_or(ParseError::InvalidChoice { line: line.number })?;

        let target = trim(target);
        if !is_label(target) {
            return Err(ParseError::InvalidChoiceLabel { line: line.number });
        }
        let link = strip_label(target);
        if !scenes.contains_key(link) {
            return Err(ParseError::UndefinedChoiceLabel {
                line: line.number,
                label: lossy(link).into_owned(),
            });
        }

        let choice = scene
            .choice_slot(index, link)
            .map_err(|_| ParseError::TooManyChoices { line: line.number })?;
        parse_choice_text(cursor, languages, &mut choice.text)?;
        index += 1;
    }
}

/// `code: text` lines of one choice, until a blank line.
fn parse_choice_text<'src>(
    cursor: &mut Cursor<'src>,
    languages: &LanguageTable<'src>,
    text: &mut Localized<'src>,
) -> Result<(), ParseError> {
    loop {
        let line = match next_step(cursor) {
            Step::Content(line) => line,
            Step::Skip => continue,
            Step::End => return Ok(()),
        };
        let (code, value) =
            split_once(line.text, b':').ok_or(ParseError::InvalidChoiceText { line: line.number })?;
        let index = language_index(languages, code, line.number)?;
        text.set(index, trim(value))
            .map_err(|_| ParseError::DuplicateLanguage { line: line.number })?;
    }
}

fn language_index(languages: &LanguageTable<'_>, code: &[u8], line: usize) -> Result<usize, ParseError> {
    let code = trim(code);
    languages.index_of(code).ok_or_else(|| ParseError::UnknownLanguage {
        line,
        code: lossy(code).into_owned(),
    })
}
