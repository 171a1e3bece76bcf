//! Robop - interactive espeak front end with neural resynthesis
//!
//! Typed text is spoken by espeak, written to a WAV file, and optionally
//! passed through a RAVE-style encoder/decoder model to change its timbre.
//! Model output is shifted to compensate for the model's known latency.

pub mod audio;
pub mod error;
pub mod input;
pub mod logging;
pub mod models;
pub mod platform;
pub mod resynth;
pub mod session;
pub mod speech;
pub mod state;

pub use error::{Result, RobopError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "robop";
