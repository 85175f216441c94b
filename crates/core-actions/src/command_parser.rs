//! Host command line parsing.
//!
//! Converts one line of host input into a `HostCommand`. Pure classification; no side effects.
//! The pattern after `leap ` is taken verbatim (after exactly one separating space) so patterns
//! may begin or end with whitespace.

use core_state::Toggle;
use core_text::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Leap(String),
    RepeatForward,
    RepeatBack,
    /// Previous pattern with the current toggles.
    LeapAgain,
    Toggle(Toggle),
    CaretOffset(usize),
    CaretPosition(Position),
    Show,
    Quit,
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> HostCommand {
        let line = raw.trim_end_matches(['\n', '\r']);
        if let Some(pattern) = line.strip_prefix("leap ") {
            return HostCommand::Leap(pattern.to_string());
        }
        let s = line.trim();
        match s {
            "next" | "n" => return HostCommand::RepeatForward,
            "prev" | "p" => return HostCommand::RepeatBack,
            "again" => return HostCommand::LeapAgain,
            "show" => return HostCommand::Show,
            "quit" | "q" => return HostCommand::Quit,
            _ => {}
        }
        if let Some(which) = s.strip_prefix("toggle ") {
            match which.trim() {
                "insert" => return HostCommand::Toggle(Toggle::InsertLeft),
                "select" => return HostCommand::Toggle(Toggle::SelectToMatch),
                "backwards" => return HostCommand::Toggle(Toggle::SearchBackwards),
                _ => {}
            }
        }
        if let Some(arg) = s.strip_prefix("caret ") {
            let arg = arg.trim();
            // Positions are typed 1-based like the host displays them.
            if let Some((line, col)) = arg.split_once(':')
                && let (Ok(line), Ok(col)) = (line.parse::<usize>(), col.parse::<usize>())
                && line > 0
                && col > 0
            {
                return HostCommand::CaretPosition(Position::new(line - 1, col - 1));
            }
            if let Ok(offset) = arg.parse::<usize>() {
                return HostCommand::CaretOffset(offset);
            }
        }
        HostCommand::Unknown(s.to_string())
    }
}
