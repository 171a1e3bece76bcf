//! Error types for Robop

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Robop
#[derive(Error, Debug)]
pub enum RobopError {
    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("Invalid value '{value}' for {param}: expected {expected}")]
    InvalidValue {
        param: String,
        value: String,
        expected: String,
    },

    #[error("{0}")]
    Usage(String),

    #[error("Unknown model '{0}'")]
    ModelLookup(String),

    #[error("Failed to load model '{name}': {reason}")]
    ModelLoad { name: String, reason: String },

    #[error("External tool error: {0}")]
    ExternalTool(String),

    /// Latency compensation window does not fit inside the decoded waveform
    #[error("Model '{model}' latency of {remove} samples does not fit in a {len} sample waveform")]
    Boundary {
        model: String,
        remove: usize,
        len: usize,
    },

    #[error("Audio error in {path:?}: {reason}")]
    Audio { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

impl RobopError {
    /// Errors caused by what the user typed rather than by the system
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            RobopError::UnknownParameter(_) | RobopError::InvalidValue { .. } | RobopError::Usage(_)
        )
    }

    pub(crate) fn audio(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        RobopError::Audio {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for Robop operations
pub type Result<T> = std::result::Result<T, RobopError>;

impl From<String> for RobopError {
    fn from(s: String) -> Self {
        RobopError::Other(s)
    }
}

impl From<&str> for RobopError {
    fn from(s: &str) -> Self {
        RobopError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_input_classification() {
        assert!(RobopError::UnknownParameter("bogus".into()).is_user_input());
        assert!(RobopError::Usage("set what?".into()).is_user_input());
        assert!(!RobopError::ModelLookup("human".into()).is_user_input());
        assert!(!RobopError::ExternalTool("espeak exited 1".into()).is_user_input());
    }

    #[test]
    fn test_unknown_parameter_names_offender() {
        let msg = RobopError::UnknownParameter("bogus".into()).to_string();
        assert_eq!(msg, "Unknown parameter 'bogus'");
    }
}
