//! User input: reading lines and interpreting commands

pub mod command;
pub mod interpreter;
pub mod line_source;

pub use command::{Assignment, Command};
pub use interpreter::{help_text, CommandInterpreter};
pub use line_source::{LineEvent, LineSource, ReaderSource, TerminalInput};
