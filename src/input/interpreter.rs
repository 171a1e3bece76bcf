//! Command interpreter
//!
//! Turns one line of input into either a side effect (help, voice listing,
//! parameter changes, quit request) or text for the render pipeline.
//! User mistakes are reported on the output writer and never end the
//! session.

use super::command::{self, Assignment, Command, SET_USAGE};
use crate::speech::SpeechGenerator;
use crate::state::{Param, SessionState};
use crate::{Result, RobopError};
use log::{debug, error, warn};
use std::io::Write;

pub struct CommandInterpreter<W: Write> {
    out: W,
    quit_requested: bool,
}

impl<W: Write> CommandInterpreter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            quit_requested: false,
        }
    }

    /// Handle one line of input
    ///
    /// Returns the text to speak, if the line was not a command.
    pub fn process(
        &mut self,
        line: &str,
        state: &mut SessionState,
        voices: &mut dyn SpeechGenerator,
    ) -> Option<String> {
        match self.execute(line, state, voices) {
            Ok(text) => text,
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    fn execute(
        &mut self,
        line: &str,
        state: &mut SessionState,
        voices: &mut dyn SpeechGenerator,
    ) -> Result<Option<String>> {
        match command::parse(line)? {
            Command::Empty => Ok(None),
            Command::Help => {
                write!(self.out, "{}", help_text(state))?;
                Ok(None)
            }
            Command::Quit => {
                debug!("Quit requested");
                self.quit_requested = true;
                Ok(None)
            }
            Command::Voices(language) => {
                let listing = voices.list_voices(language.as_deref())?;
                write!(self.out, "{}", listing)?;
                Ok(None)
            }
            Command::Set {
                assignments,
                malformed,
            } => {
                self.apply(&assignments, &malformed, state)?;
                Ok(None)
            }
            Command::Speak(text) => Ok(Some(text)),
        }
    }

    /// Apply assignments left to right
    ///
    /// A bad assignment is reported and skipped; the rest still apply.
    fn apply(
        &mut self,
        assignments: &[Assignment],
        malformed: &[String],
        state: &mut SessionState,
    ) -> Result<()> {
        debug!("Matched parameters: {:?}", assignments);

        for token in malformed {
            writeln!(
                self.out,
                "Error: '{}' is not a parameter assignment (expected key=value)",
                token
            )?;
        }
        if assignments.is_empty() {
            return Err(RobopError::Usage(SET_USAGE.to_string()));
        }

        for assignment in assignments {
            match state.set(&assignment.key, &assignment.value) {
                Ok(confirmation) => writeln!(self.out, "{}", confirmation)?,
                Err(e) => self.report(&e),
            }
        }
        Ok(())
    }

    fn report(&mut self, e: &RobopError) {
        if e.is_user_input() {
            debug!("Rejected input: {}", e);
        } else {
            warn!("Command failed: {}", e);
        }
        if let Err(write_err) = writeln!(self.out, "Error: {}", e) {
            error!("Failed to write to output: {}", write_err);
        }
    }

    /// Whether `quit` or `exit` has been entered
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub(crate) fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

/// Usage text, with every settable parameter and its default
pub fn help_text(state: &SessionState) -> String {
    let mut text = String::from(
        "Enter text to speak.\n\
         Type help to show this help text\n\
         Type quit (or exit) to exit\n\
         Type voices to list all espeak voices on your system\n\
         Type voices=en to list all espeak voices for a given language (in this case 'en')\n\
         Type set followed by parameter assignments to set values\n\
         \x20   example:\n\
         \x20   set pitch=80 amp=100 gap=1 speed=70 model=human\n\
         \n\
         Settable parameters:\n",
    );

    let defaults = state.defaults();
    for param in Param::ALL {
        let default = defaults.value_of(param);
        text.push_str(&format!(
            "    {:<24}{} (default: {})\n",
            format!("{}={}", param, default),
            param.accepted(),
            default
        ));
    }

    if !state.available_models().is_empty() {
        text.push_str(&format!(
            "\nLoaded models: {}\n",
            state.available_models().join(", ")
        ));
    }
    text
}
