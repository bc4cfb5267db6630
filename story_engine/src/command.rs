//! Command module
//!
//! Describes the commands a player can type while a story runs.
use variantly;

/// Commands that can be executed by the player.
#[derive(Debug, Clone, PartialEq, Eq, variantly::Variantly)]
pub enum Command {
    /// Pick the numbered choice of the current scene (1-based).
    Choose(usize),
    Empty,
    Help,
    /// Switch to the language with this code.
    Language(String),
    /// List the declared languages.
    Languages,
    Quit,
    /// Show the current scene again.
    Scene,
    Unknown,
}

/// Parses an input line and returns the corresponding `Command`.
///
/// Words are matched exactly; extra words after a command make it unknown.
pub fn parse_command(input: &str) -> Command {
    let words: Vec<&str> = input.split_whitespace().collect();
    match words.as_slice() {
        [] => Command::Empty,
        ["quit" | "exit"] => Command::Quit,
        ["scene" | "print"] => Command::Scene,
        ["help" | "?"] => Command::Help,
        ["lang" | "language"] => Command::Languages,
        ["lang" | "language", code] => Command::Language((*code).to_string()),
        [number] => number.parse().map_or(Command::Unknown, Command::Choose),
        _ => Command::Unknown,
    }
}
