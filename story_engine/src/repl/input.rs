//! Line input for the story REPL.
//!
//! An interactive terminal gets a rustyline editor with history and tab
//! completion of commands and of the story's language codes after `lang`.
//! Pipes and scripts are read line by line from stdin.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use lazy_static::lazy_static;
use log::{info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Outcome of reading a line from the REPL input.
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

lazy_static! {
    static ref COMMAND_TERMS: Vec<&'static str> = {
        let mut terms = vec!["help", "quit", "exit", "scene", "print", "lang", "language"];
        terms.sort_unstable();
        terms
    };
}

/// Completion candidates for `line` up to `pos`: the start of the word being
/// completed and the words that may replace it.
fn completions(languages: &[String], line: &str, pos: usize) -> (usize, Vec<String>) {
    let head = &line[..pos];
    let start = head.rfind(char::is_whitespace).map_or(0, |at| at + 1);
    let partial = &head[start..];
    let before: Vec<&str> = head[..start].split_whitespace().collect();

    let candidates: Vec<String> = match before.as_slice() {
        [] if !partial.is_empty() => COMMAND_TERMS
            .iter()
            .filter(|term| term.starts_with(&partial.to_lowercase()))
            .map(|term| (*term).to_string())
            .collect(),
        ["lang" | "language"] => languages
            .iter()
            .filter(|code| code.starts_with(partial))
            .cloned()
            .collect(),
        _ => Vec::new(),
    };
    (start, candidates)
}

/// Rustyline helper completing against one story's languages.
struct StoryHelper {
    languages: Vec<String>,
}

impl Helper for StoryHelper {}

impl Completer for StoryHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = completions(&self.languages, line, pos);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for StoryHelper {
    type Hint = String;
}

impl Highlighter for StoryHelper {}

impl Validator for StoryHelper {}

/// Reads player input, from rustyline when stdin is a terminal.
pub struct InputManager {
    editor: Option<Editor<StoryHelper, DefaultHistory>>,
    history_path: Option<PathBuf>,
    buffer: String,
}

impl InputManager {
    /// `languages` are the story's declared codes, offered after `lang `.
    pub fn new(languages: Vec<String>) -> Self {
        let history_path = dirs::data_dir().map(|dir| dir.join("storyc").join("history.txt"));
        let editor = if io::stdin().is_terminal() {
            open_editor(languages, history_path.as_ref())
        } else {
            info!("stdin is not a TTY; reading plain lines");
            None
        };
        Self {
            editor,
            history_path,
            buffer: String::new(),
        }
    }

    /// Read one line without its terminator.
    ///
    /// # Errors
    /// Returns terminal and stdin read failures.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        let Some(editor) = self.editor.as_mut() else {
            return self.read_plain(prompt);
        };
        match editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                    if let Some(path) = self.history_path.as_ref()
                        && let Err(err) = editor.save_history(path)
                    {
                        warn!("failed to save history to {}: {err}", path.display());
                    }
                }
                Ok(InputEvent::Line(line))
            },
            Err(ReadlineError::Interrupted) => Ok(InputEvent::Interrupted),
            Err(ReadlineError::Eof) => Ok(InputEvent::Eof),
            Err(ReadlineError::Io(err)) => Err(err),
            Err(other) => Err(io::Error::other(other)),
        }
    }

    fn read_plain(&mut self, prompt: &str) -> io::Result<InputEvent> {
        print!("{prompt}");
        io::stdout().flush()?;

        self.buffer.clear();
        if io::stdin().read_line(&mut self.buffer)? == 0 {
            return Ok(InputEvent::Eof);
        }
        let line = self.buffer.trim_end_matches(['\n', '\r']);
        Ok(InputEvent::Line(line.to_string()))
    }
}

fn open_editor(languages: Vec<String>, history_path: Option<&PathBuf>) -> Option<Editor<StoryHelper, DefaultHistory>> {
    let mut editor = match Editor::new() {
        Ok(editor) => editor,
        Err(err) => {
            warn!("failed to initialize rustyline ({err}), reading plain lines");
            return None;
        },
    };
    editor.set_helper(Some(StoryHelper { languages }));

    if let Some(path) = history_path {
        if let Some(dir) = path.parent()
            && let Err(err) = fs::create_dir_all(dir)
        {
            warn!("failed to create history directory {}: {err}", dir.display());
        }
        if editor.load_history(path).is_err() {
            info!("no history loaded from {}", path.display());
        }
    }
    info!("using rustyline-backed REPL input");
    Some(editor)
}
