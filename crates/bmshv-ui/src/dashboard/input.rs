//! Console input

use bmshv_core::{ProtocolError, UserAction};

/// One line typed at the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleInput {
    Action(UserAction),
    Help,
    Exit,
    Empty,
}

/// Interpret a console line
///
/// Actions are accepted by key (`start-charging`) or by label
/// (`Start Charging`).
pub fn parse_input(line: &str) -> Result<ConsoleInput, ProtocolError> {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" => Ok(ConsoleInput::Empty),
        "exit" | "quit" | "q" => Ok(ConsoleInput::Exit),
        "help" | "?" => Ok(ConsoleInput::Help),
        _ => trimmed.parse().map(ConsoleInput::Action),
    }
}

/// List of accepted commands
pub fn help_text() -> String {
    let mut text = String::from("Commands:\n");
    for action in UserAction::ALL {
        text.push_str(&format!("  {:<16} {}\n", action.key(), action.label()));
    }
    text.push_str(&format!("  {:<16} {}\n", "help", "Show this list"));
    text.push_str(&format!("  {:<16} {}\n", "exit", "Quit"));
    text
}
