//! Parser for story documents.
//!
//! Runs three stages over one buffer: the header, a label pre-registration
//! scan of the whole document, then the label bodies. The first error aborts
//! the whole parse.

use log::debug;
use story_data::{HashTable, LanguageTable, Story, TableError, lossy};

mod body;
mod header;
mod helpers;
mod labels;

use body::parse_body;
use header::parse_header;
use helpers::Cursor;
use labels::register_labels;

/// Errors that can happen when parsing a story document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("document does not contain a language list")]
    MissingLanguages,
    #[error("document does not contain a start label")]
    MissingStart,
    #[error("document does not contain a quit label")]
    MissingQuit,
    #[error("invalid start label at line {line}")]
    InvalidStartLabel { line: usize },
    #[error("invalid quit label at line {line}")]
    InvalidQuitLabel { line: usize },
    #[error("start label [{label}] is not defined in the document")]
    UndefinedStartLabel { label: String },
    #[error("invalid label at line {line}")]
    InvalidLabel { line: usize },
    #[error("label [{label}] at line {line} was not registered")]
    UndefinedLabel { line: usize, label: String },
    #[error("invalid label text at line {line}: expected `language: text`")]
    InvalidText { line: usize },
    #[error("invalid paragraph starting at line {line}: expected two `~~~` lines")]
    InvalidParagraph { line: usize },
    #[error("unknown language `{code}` at line {line}")]
    UnknownLanguage { line: usize, code: String },
    #[error("duplicate language string at line {line}")]
    DuplicateLanguage { line: usize },
    #[error("invalid option at line {line}: expected `N. [label]`")]
    InvalidChoice { line: usize },
    #[error("invalid option label at line {line}")]
    InvalidChoiceLabel { line: usize },
    #[error("option at line {line} points to undefined label [{label}]")]
    UndefinedChoiceLabel { line: usize, label: String },
    #[error("invalid option text at line {line}: expected `language: text`")]
    InvalidChoiceText { line: usize },
    #[error("too many options at line {line}")]
    TooManyChoices { line: usize },
    #[error("too many languages at line {line}")]
    TooManyLanguages { line: usize },
    #[error("language `{code}` declared again at line {line}")]
    RepeatedLanguage { line: usize, code: String },
    #[error("internal error: {0}")]
    Table(#[from] TableError),
}

impl ParseError {
    /// Line the error points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::InvalidStartLabel { line }
            | ParseError::InvalidQuitLabel { line }
            | ParseError::InvalidLabel { line }
            | ParseError::UndefinedLabel { line, .. }
            | ParseError::InvalidText { line }
            | ParseError::InvalidParagraph { line }
            | ParseError::UnknownLanguage { line, .. }
            | ParseError::DuplicateLanguage { line }
            | ParseError::InvalidChoice { line }
            | ParseError::InvalidChoiceLabel { line }
            | ParseError::UndefinedChoiceLabel { line, .. }
            | ParseError::InvalidChoiceText { line }
            | ParseError::TooManyChoices { line }
            | ParseError::TooManyLanguages { line }
            | ParseError::RepeatedLanguage { line, .. } => Some(*line),
            ParseError::MissingLanguages
            | ParseError::MissingStart
            | ParseError::MissingQuit
            | ParseError::UndefinedStartLabel { .. }
            | ParseError::Table(_) => None,
        }
    }
}

/// Parse a whole document into a [`Story`] borrowing from `src`.
///
/// # Errors
/// Returns the first [`ParseError`] met; no partial story is produced.
pub fn parse_story(src: &[u8]) -> Result<Story<'_>, ParseError> {
    let mut scenes = HashTable::new();
    let mut languages = LanguageTable::new();
    let mut cursor = Cursor::new(src);

    let header = parse_header(&mut cursor, &mut languages, &mut scenes)?;

    register_labels(src, &mut scenes)?;
    if !scenes.contains_key(header.start) {
        return Err(ParseError::UndefinedStartLabel {
            label: lossy(header.start).into_owned(),
        });
    }

    parse_body(src, &mut cursor, &languages, &mut scenes)?;
    debug!("parsed {} scenes in {} languages", scenes.len(), languages.len());

    Ok(Story {
        scenes,
        languages,
        start: header.start,
        quit: header.quit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "languages:\nen\nfr\n\nstart: [intro]\nquit: [end]\n\n";

    fn doc(body: &str) -> String {
        format!("{HEADER}{body}")
    }

    fn text<'a>(story: &'a Story<'_>, label: &str, language: usize) -> Option<&'a str> {
        let scene = story.scene(label.as_bytes())?;
        scene.text.get(language).and_then(|t| std::str::from_utf8(t).ok())
    }

    #[test]
    fn parses_header_in_any_order() {
        let src = "quit: [end]\n# note\nstart:[intro]\nlanguages:\n# codes\nen\n\n[intro]\nen: Hi\n";
        let story = parse_story(src.as_bytes()).expect("parse ok");
        assert_eq!(story.start, b"intro");
        assert_eq!(story.quit, b"end");
        assert_eq!(story.languages.len(), 1);
        assert!(story.scene(b"end").is_some_and(|s| s.is_placeholder()));
        assert_eq!(text(&story, "intro", 0), Some("Hi"));
    }

    #[test]
    fn missing_sections_are_reported_in_order() {
        assert_eq!(
            parse_story(b"start: [a]\nquit: [b]\n").unwrap_err(),
            ParseError::MissingLanguages
        );
        assert_eq!(
            parse_story(b"languages:\nen\n\nquit: [b]\n").unwrap_err(),
            ParseError::MissingStart
        );
        assert_eq!(
            parse_story(b"languages:\nen\n\nstart: [a]\n").unwrap_err(),
            ParseError::MissingQuit
        );
        assert_eq!(parse_story(b"").unwrap_err(), ParseError::MissingLanguages);
    }

    #[test]
    fn malformed_header_labels_fail() {
        let err = parse_story(b"languages:\nen\n\nstart: intro\nquit: [end]\n").unwrap_err();
        assert_eq!(err, ParseError::InvalidStartLabel { line: 4 });
        let err = parse_story(b"languages:\nen\n\nstart: [intro]\nquit: end]\n").unwrap_err();
        assert_eq!(err, ParseError::InvalidQuitLabel { line: 5 });
    }

    #[test]
    fn start_label_must_be_defined() {
        let err = parse_story(b"languages:\nen\n\nstart: [intro]\nquit: [end]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UndefinedStartLabel {
                label: "intro".into()
            }
        );
    }

    #[test]
    fn too_many_languages_fail() {
        let src = "languages:\na\nb\nc\nd\ne\nf\ng\nh\ni\n\nstart: [x]\nquit: [y]\n";
        assert_eq!(
            parse_story(src.as_bytes()).unwrap_err(),
            ParseError::TooManyLanguages { line: 10 }
        );
    }

    #[test]
    fn repeated_language_code_fails() {
        let src = "languages:\nen\n# again\n en \n\nstart: [x]\nquit: [y]\n";
        let err = parse_story(src.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            ParseError::RepeatedLanguage {
                line: 4,
                code: "en".into()
            }
        );
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn forward_references_resolve() {
        let src = doc("[intro]\nen: Start\n\n1. [later]\nen: Go on\n\n\n[later]\nen: Later\n\n1. [end]\nen: Stop\n");
        let story = parse_story(src.as_bytes()).expect("parse ok");
        let intro = story.scene(b"intro").unwrap();
        assert_eq!(intro.choices()[0].link, b"later");
        assert_eq!(text(&story, "later", 0), Some("Later"));
    }

    #[test]
    fn choices_keep_order_and_text() {
        let src = doc(
            "[intro]\nen: Pick\n\n1. [a]\nen: First\nfr: Premier\n\n2. [b]\n# comment inside\nen:  Second  \n\n\n[a]\n\n\n[b]\n",
        );
        let story = parse_story(src.as_bytes()).expect("parse ok");
        let intro = story.scene(b"intro").unwrap();
        let links: Vec<_> = intro.choices().iter().map(|c| c.link).collect();
        assert_eq!(links, vec![&b"a"[..], &b"b"[..]]);
        assert_eq!(intro.choices()[0].text.get(1), Some(&b"Premier"[..]));
        assert_eq!(intro.choices()[1].text.get(0), Some(&b"Second"[..]));
        assert_eq!(intro.choices()[1].text.get(1), None);
    }

    #[test]
    fn text_line_without_colon_fails_with_line_number() {
        let src = doc("[intro]\nen Hello\n");
        assert_eq!(parse_story(src.as_bytes()).unwrap_err(), ParseError::InvalidText { line: 9 });
    }

    #[test]
    fn non_label_line_between_blocks_fails() {
        let src = doc("[intro]\n\n\nintro\n");
        assert_eq!(parse_story(src.as_bytes()).unwrap_err(), ParseError::InvalidLabel { line: 11 });
    }

    #[test]
    fn unknown_language_fails() {
        let src = doc("[intro]\nde: Hallo\n");
        assert_eq!(
            parse_story(src.as_bytes()).unwrap_err(),
            ParseError::UnknownLanguage {
                line: 9,
                code: "de".into()
            }
        );
    }

    #[test]
    fn duplicate_scene_language_fails() {
        let src = doc("[intro]\nen: Hello\nen: Again\n");
        assert_eq!(
            parse_story(src.as_bytes()).unwrap_err(),
            ParseError::DuplicateLanguage { line: 10 }
        );
    }

    #[test]
    fn duplicate_choice_language_fails() {
        let src = doc("[intro]\nen: Hello\n\n1. [end]\nen: Bye\nen: Bye again\n");
        assert_eq!(
            parse_story(src.as_bytes()).unwrap_err(),
            ParseError::DuplicateLanguage { line: 13 }
        );
    }

    #[test]
    fn choice_errors_are_distinguished() {
        let missing_dot = doc("[intro]\nen: Hi\n\n1 [end]\n");
        assert_eq!(
            parse_story(missing_dot.as_bytes()).unwrap_err(),
            ParseError::InvalidChoice { line: 11 }
        );
        let bad_label = doc("[intro]\nen: Hi\n\n1. end\n");
        assert_eq!(
            parse_story(bad_label.as_bytes()).unwrap_err(),
            ParseError::InvalidChoiceLabel { line: 11 }
        );
        let undefined = doc("[intro]\nen: Hi\n\n1. [missing]\n");
        assert_eq!(
            parse_story(undefined.as_bytes()).unwrap_err(),
            ParseError::UndefinedChoiceLabel {
                line: 11,
                label: "missing".into()
            }
        );
        let bad_text = doc("[intro]\nen: Hi\n\n1. [end]\nen Bye\n");
        assert_eq!(
            parse_story(bad_text.as_bytes()).unwrap_err(),
            ParseError::InvalidChoiceText { line: 12 }
        );
    }

    #[test]
    fn too_many_choices_fail() {
        let mut body = String::from("[intro]\nen: Hi\n\n");
        for n in 1..=9 {
            body.push_str(&format!("{n}. [end]\nen: Choice {n}\n\n"));
        }
        let err = parse_story(doc(&body).as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::TooManyChoices { .. }));
        assert_eq!(err.line(), Some(11 + 8 * 3));
    }

    #[test]
    fn paragraph_keeps_inner_lines_verbatim() {
        let src = doc("[intro]\nen:\n~~~\n\nLine A\n# not a comment\n\nLine B\n~~~\nfr: Salut\n");
        let story = parse_story(src.as_bytes()).expect("parse ok");
        assert_eq!(text(&story, "intro", 0), Some("Line A\n# not a comment\n\nLine B"));
        assert_eq!(text(&story, "intro", 1), Some("Salut"));
    }

    #[test]
    fn unterminated_paragraph_fails_at_its_opening_line() {
        let src = doc("[intro]\nen:\n~~~\nLine A\n");
        assert_eq!(
            parse_story(src.as_bytes()).unwrap_err(),
            ParseError::InvalidParagraph { line: 9 }
        );
    }

    #[test]
    fn redefined_label_merges_into_one_scene() {
        let src = doc("[intro]\nen: Hello\n\n1. [end]\nen: Bye\n\n\n[intro]\nfr: Bonjour\n");
        let story = parse_story(src.as_bytes()).expect("parse ok");
        assert_eq!(text(&story, "intro", 0), Some("Hello"));
        assert_eq!(text(&story, "intro", 1), Some("Bonjour"));
        assert_eq!(story.scene(b"intro").unwrap().choice_count(), 1);

        let clash = doc("[intro]\nen: Hello\n\n\n[intro]\nen: Again\n");
        assert_eq!(
            parse_story(clash.as_bytes()).unwrap_err(),
            ParseError::DuplicateLanguage { line: 13 }
        );
    }

    #[test]
    fn redefined_label_refills_its_choices_in_order() {
        let src = doc("[intro]\nen: Hello\n\n1. [end]\nen: Bye\n\n\n[intro]\nfr: Bonjour\n\n1. [end]\nfr: Salut\n\n2. [intro]\nen: Again\n");
        let story = parse_story(src.as_bytes()).expect("parse ok");
        let intro = story.scene(b"intro").unwrap();
        assert_eq!(intro.choice_count(), 2);
        assert_eq!(intro.choices()[0].text.get(0), Some(&b"Bye"[..]));
        assert_eq!(intro.choices()[0].text.get(1), Some(&b"Salut"[..]));
        assert_eq!(intro.choices()[1].link, b"intro");

        let clash = doc("[intro]\nen: Hello\n\n1. [end]\nen: Bye\n\n\n[intro]\nfr: Bonjour\n\n1. [end]\nen: Bye again\n");
        assert_eq!(
            parse_story(clash.as_bytes()).unwrap_err(),
            ParseError::DuplicateLanguage { line: 19 }
        );
    }

    #[test]
    fn label_line_inside_a_block_is_malformed() {
        let in_text = doc("[intro]\nen: Hello\n[end]\n");
        assert_eq!(
            parse_story(in_text.as_bytes()).unwrap_err(),
            ParseError::InvalidText { line: 10 }
        );
        let in_choices = doc("[intro]\nen: Hello\n\n1. [end]\nen: Bye\n\n[end]\n");
        assert_eq!(
            parse_story(in_choices.as_bytes()).unwrap_err(),
            ParseError::InvalidChoice { line: 14 }
        );
        let in_choice_text = doc("[intro]\nen: Hello\n\n1. [end]\n[end]\n");
        assert_eq!(
            parse_story(in_choice_text.as_bytes()).unwrap_err(),
            ParseError::InvalidChoiceText { line: 12 }
        );
    }

    #[test]
    fn crlf_documents_parse_like_lf() {
        let lf = doc("[intro]\nen: Hello\n\n1. [end]\nen: Bye\n");
        let crlf = lf.replace('\n', "\r\n");
        let a = parse_story(lf.as_bytes()).expect("lf ok");
        let b = parse_story(crlf.as_bytes()).expect("crlf ok");
        assert_eq!(text(&a, "intro", 0), text(&b, "intro", 0));
        assert_eq!(
            a.scene(b"intro").unwrap().choices(),
            b.scene(b"intro").unwrap().choices()
        );
    }

    #[test]
    fn parsed_text_borrows_from_the_source() {
        let src = doc("[intro]\nen: Hello\n");
        let bytes = src.as_bytes();
        let story = parse_story(bytes).expect("parse ok");
        let hello = story.scene(b"intro").unwrap().text.get(0).unwrap();
        let range = bytes.as_ptr_range();
        assert!(range.contains(&hello.as_ptr()));
    }
}
