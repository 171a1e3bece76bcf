//! Speech generation

pub mod espeak;
pub mod output;
pub mod synth;

pub use espeak::EspeakGenerator;
pub use output::OutputWait;
pub use synth::{SpeechGenerator, TtsRequest};
