//! Text-to-speech generator abstraction
//!
//! The generator is an external program that renders text to a WAV file.
//! Robop never speaks through it directly; the file is played (and
//! optionally resynthesized) afterwards.

use crate::state::SessionState;
use crate::Result;
use std::path::{Path, PathBuf};

/// Everything the generator needs to render one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsRequest {
    /// Speech rate in words per minute
    pub speed: u32,
    /// Word gap in units of 10ms
    pub gap: u32,
    /// Pitch 0-99
    pub pitch: u32,
    /// Amplitude 0-200
    pub amp: u32,
    pub voice: String,
    pub output: PathBuf,
    pub text: String,
}

impl TtsRequest {
    /// Build a request from the current session parameters
    pub fn from_state(state: &SessionState, text: &str, output: &Path) -> Self {
        Self {
            speed: state.speed(),
            gap: state.gap(),
            pitch: state.pitch(),
            amp: state.amp(),
            voice: state.voice().to_string(),
            output: output.to_path_buf(),
            text: text.to_string(),
        }
    }
}

/// External text-to-speech generator
pub trait SpeechGenerator {
    /// Render text to `request.output`
    ///
    /// Returns once the generator has exited successfully.
    fn synthesize(&mut self, request: &TtsRequest) -> Result<()>;

    /// List installed voices, optionally only those for a language
    fn list_voices(&mut self, language: Option<&str>) -> Result<String>;
}
