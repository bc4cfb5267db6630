//! Interactive player for a compiled [`Story`].
//!
//! The story runs in a read-eval-print loop: the current scene is shown in the
//! current language, the player types a choice number or a command, and the
//! loop ends when the quit label is reached.

mod input;

pub use input::{InputEvent, InputManager};

use std::io::{self, Write};

use anyhow::Result;
use log::{debug, info};
use story_data::{Localized, Story, lossy};
use textwrap::{fill, termwidth};
use thiserror::Error;

use crate::command::{Command, parse_command};
use crate::style::StoryStyle;

/// Shown when a scene or choice has no text in the current language.
pub const MISSING_TEXT: &str = "{missing string}";

const HELP_TEXT: &str = "\
Type the number of a choice to follow it.

  scene, print        show the current scene again
  lang, language      list the available languages
  lang <code>         switch to another language
  help, ?             show this help
  quit, exit          leave the story";

/// Control flow signal used by handlers to exit the REPL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplControl {
    Continue,
    Quit,
}

/// Reasons a player request cannot be carried out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("there is no choice {number} here")]
    NoSuchChoice { number: usize },
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),
    #[error("scene [{0}] is missing from the story")]
    MissingScene(String),
}

/// Position of a player inside a story.
pub struct Session<'a, 'src> {
    story: &'a Story<'src>,
    current: &'src [u8],
    language: usize,
    turn: usize,
    width: usize,
}

impl<'a, 'src> Session<'a, 'src> {
    /// Start at the story's start label in the first declared language.
    pub fn new(story: &'a Story<'src>) -> Self {
        Self {
            story,
            current: story.start,
            language: 0,
            turn: 1,
            width: termwidth(),
        }
    }

    /// Wrap scene text at `width` columns instead of the terminal width.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn current_label(&self) -> &'src [u8] {
        self.current
    }

    pub fn language(&self) -> usize {
        self.language
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    /// True once the quit label has been reached.
    pub fn is_finished(&self) -> bool {
        self.story.is_quit(self.current)
    }

    /// Follow choice `number` (1-based) of the current scene.
    ///
    /// # Errors
    /// Fails when the scene has no such choice.
    pub fn choose(&mut self, number: usize) -> Result<&'src [u8], SelectError> {
        let scene = self
            .story
            .scene(self.current)
            .ok_or_else(|| SelectError::MissingScene(lossy(self.current).into_owned()))?;
        let choice = number
            .checked_sub(1)
            .and_then(|index| scene.choices().get(index))
            .ok_or(SelectError::NoSuchChoice { number })?;
        debug!("turn {}: choice {number} -> [{}]", self.turn, lossy(choice.link));
        self.current = choice.link;
        self.turn += 1;
        info!("turn {}: entering [{}]", self.turn, lossy(self.current));
        Ok(self.current)
    }

    /// Switch to the language declared with `code`.
    ///
    /// # Errors
    /// Fails when the story does not declare `code`.
    pub fn set_language(&mut self, code: &str) -> Result<usize, SelectError> {
        let index = self
            .story
            .languages
            .index_of(code.as_bytes())
            .ok_or_else(|| SelectError::UnknownLanguage(code.to_string()))?;
        self.language = index;
        info!("language switched to '{code}'");
        Ok(index)
    }

    /// Print the current scene text and its numbered choices.
    ///
    /// # Errors
    /// Propagates write failures and reports a scene missing from the story.
    pub fn render_scene<W: Write>(&self, out: &mut W) -> Result<()> {
        let scene = self
            .story
            .scene(self.current)
            .ok_or_else(|| SelectError::MissingScene(lossy(self.current).into_owned()))?;

        writeln!(out)?;
        match self.localized(&scene.text) {
            Some(text) => writeln!(out, "{}", fill(&text, self.width).scene_text_style())?,
            None => writeln!(out, "{}", MISSING_TEXT.missing_style())?,
        }
        for (n, choice) in scene.choices().iter().enumerate() {
            let number = (n + 1).to_string();
            let text = match self.localized(&choice.text) {
                Some(text) => text.choice_style(),
                None => MISSING_TEXT.missing_style(),
            };
            writeln!(out, "{} {text}", number.choice_number_style())?;
        }
        Ok(())
    }

    /// Carry out one player command, writing any response to `out`.
    ///
    /// # Errors
    /// Propagates write failures and reports a scene missing from the story.
    pub fn handle<W: Write>(&mut self, command: &Command, out: &mut W) -> Result<ReplControl> {
        match command {
            Command::Quit => return Ok(ReplControl::Quit),
            Command::Empty => {},
            Command::Help => writeln!(out, "{HELP_TEXT}")?,
            Command::Scene => self.render_scene(out)?,
            Command::Languages => self.list_languages(out)?,
            Command::Language(code) => match self.set_language(code) {
                Ok(_) => self.render_scene(out)?,
                Err(err) => {
                    writeln!(out, "{}", err.to_string().error_style())?;
                    self.list_languages(out)?;
                },
            },
            Command::Choose(number) => match self.choose(*number) {
                Ok(_) if self.is_finished() => return Ok(ReplControl::Quit),
                Ok(_) => self.render_scene(out)?,
                Err(err) => writeln!(out, "{}", err.to_string().error_style())?,
            },
            Command::Unknown => {
                writeln!(out, "{}", "We don't know what you want to do!".error_style())?;
                writeln!(out, "{}", "Type the option number to choose it.".notice_style())?;
            },
        }
        Ok(ReplControl::Continue)
    }

    fn list_languages<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Available languages:")?;
        for (index, code) in self.story.languages.iter().enumerate() {
            let marker = if index == self.language { "*" } else { " " };
            writeln!(out, " {marker} {}", lossy(code).into_owned().language_style())?;
        }
        Ok(())
    }

    fn localized(&self, text: &Localized<'src>) -> Option<String> {
        text.get(self.language).map(|bytes| lossy(bytes).into_owned())
    }
}

/// Run the read-eval-print loop until the player quits or reaches the quit label.
///
/// End of input counts as `quit`; Ctrl-C cancels the current line only.
///
/// # Errors
/// Propagates output failures and reports a scene missing from the story.
pub fn run_story(story: &Story<'_>) -> Result<()> {
    let mut session = Session::new(story);
    let codes = story.languages.iter().map(|code| lossy(code).into_owned()).collect();
    let mut input_manager = InputManager::new(codes);
    let mut out = io::stdout();
    let prompt = "> ".prompt_style().to_string();

    info!("turn 1: entering [{}]", lossy(story.start));
    if session.is_finished() {
        return Ok(());
    }
    session.render_scene(&mut out)?;

    loop {
        let input_event = if let Ok(event) = input_manager.read_line(&prompt) {
            event
        } else {
            writeln!(out, "{}", "Failed to read input. Try again.".error_style())?;
            continue;
        };

        let command = match input_event {
            InputEvent::Line(line) => parse_command(&line),
            InputEvent::Eof => Command::Quit,
            InputEvent::Interrupted => {
                writeln!(out, "{}", "Command canceled.".notice_style())?;
                continue;
            },
        };

        if session.handle(&command, &mut out)? == ReplControl::Quit {
            break;
        }
        out.flush()?;
    }
    info!("story ended after {} turns", session.turn());
    Ok(())
}
