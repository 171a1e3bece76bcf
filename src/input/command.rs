//! Command grammar
//!
//! Recognized in this order:
//!
//! ```text
//! <blank line>           ignored, nothing is spoken
//! help
//! quit | exit
//! voices | voices=<lang>
//! set <key>=<value> [<key>=<value> ...]
//! anything else is text to speak
//! ```

use crate::{Result, RobopError};
use once_cell::sync::Lazy;
use regex::Regex;

/// One `key=value` token after `set`
static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z]+)=([A-Za-z0-9_./\-]+)$").expect("Failed to compile assignment regex")
});

/// Language filter for `voices=<lang>`
static LANGUAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-]+$").expect("Failed to compile language regex"));

pub const VOICES_USAGE: &str = "usage: voices or voices=<language>, e.g. voices=en";
pub const SET_USAGE: &str =
    "set must be followed by parameter assignments, e.g. set pitch=80 amp=100";

/// A parsed `key=value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
}

/// One line of user input, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    /// List voices, optionally for one language
    Voices(Option<String>),
    /// Well-formed assignments in input order, plus tokens that were not
    Set {
        assignments: Vec<Assignment>,
        malformed: Vec<String>,
    },
    Speak(String),
    /// Blank line
    Empty,
}

/// Classify a line of input
///
/// A line that is empty or only whitespace is `Command::Empty` rather than
/// text, so it never reaches the TTS tool and does not use up a file number.
pub fn parse(line: &str) -> Result<Command> {
    if line.trim().is_empty() {
        return Ok(Command::Empty);
    }
    if line == "help" {
        return Ok(Command::Help);
    }
    if line == "quit" || line == "exit" {
        return Ok(Command::Quit);
    }
    if let Some(rest) = line.strip_prefix("voices") {
        return parse_voices(rest);
    }
    if let Some(rest) = line.strip_prefix("set") {
        return parse_set(rest);
    }
    Ok(Command::Speak(line.to_string()))
}

fn parse_voices(rest: &str) -> Result<Command> {
    if rest.trim().is_empty() {
        return Ok(Command::Voices(None));
    }
    match rest.strip_prefix('=') {
        Some(lang) if LANGUAGE.is_match(lang) => Ok(Command::Voices(Some(lang.to_string()))),
        _ => Err(RobopError::Usage(VOICES_USAGE.to_string())),
    }
}

fn parse_set(rest: &str) -> Result<Command> {
    // "setpitch=80" is neither a command nor a typo we want to speak
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return Err(RobopError::Usage(SET_USAGE.to_string()));
    }

    let mut assignments = Vec::new();
    let mut malformed = Vec::new();
    for token in rest.split_whitespace() {
        match ASSIGNMENT.captures(token) {
            Some(caps) => assignments.push(Assignment {
                key: caps[1].to_string(),
                value: caps[2].to_string(),
            }),
            None => malformed.push(token.to_string()),
        }
    }

    Ok(Command::Set {
        assignments,
        malformed,
    })
}
