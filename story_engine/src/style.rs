//! Styling helpers for terminal output.
//!
//! The [`StoryStyle`] trait applies ANSI styling via the `colored` crate.
//! Implementations for `&str` and `String` are provided so string literals can
//! be styled directly. `colored` honours `NO_COLOR` and `CLICOLOR`.

use colored::{ColoredString, Colorize};

/// Convenience trait for applying color and style to player-facing text.
pub trait StoryStyle {
    fn scene_text_style(&self) -> ColoredString;
    fn choice_number_style(&self) -> ColoredString;
    fn choice_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn language_style(&self) -> ColoredString;
    fn missing_style(&self) -> ColoredString;
    fn notice_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn title_style(&self) -> ColoredString;
}

impl StoryStyle for &str {
    fn scene_text_style(&self) -> ColoredString {
        self.italic().truecolor(102, 208, 250)
    }
    fn choice_number_style(&self) -> ColoredString {
        let bracketed = format!("[{self}]");
        bracketed.bold().truecolor(220, 180, 40)
    }
    fn choice_style(&self) -> ColoredString {
        self.truecolor(110, 220, 110)
    }
    fn prompt_style(&self) -> ColoredString {
        self.bold().truecolor(223, 77, 10)
    }
    fn language_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220)
    }
    fn missing_style(&self) -> ColoredString {
        self.dimmed().italic()
    }
    fn notice_style(&self) -> ColoredString {
        self.italic().truecolor(230, 230, 30)
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
    fn title_style(&self) -> ColoredString {
        self.bright_yellow().underline()
    }
}

impl StoryStyle for String {
    fn scene_text_style(&self) -> ColoredString {
        self.as_str().scene_text_style()
    }
    fn choice_number_style(&self) -> ColoredString {
        self.as_str().choice_number_style()
    }
    fn choice_style(&self) -> ColoredString {
        self.as_str().choice_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
    fn language_style(&self) -> ColoredString {
        self.as_str().language_style()
    }
    fn missing_style(&self) -> ColoredString {
        self.as_str().missing_style()
    }
    fn notice_style(&self) -> ColoredString {
        self.as_str().notice_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn title_style(&self) -> ColoredString {
        self.as_str().title_style()
    }
}
