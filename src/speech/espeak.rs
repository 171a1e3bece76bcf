//! espeak / espeak-ng generator backend
//!
//! Text is written to the generator's stdin, so no shell or quoting is
//! involved. MBROLA voices (`mb/...`) work when installed for espeak.
//!
//! Dependencies:
//! - espeak or espeak-ng (install with: sudo apt install espeak-ng)

use super::synth::{SpeechGenerator, TtsRequest};
use crate::platform::{feed_and_wait, probe_executable};
use crate::{Result, RobopError};
use log::{debug, error};
use std::process::{Command, Stdio};

/// Generator that runs espeak to produce WAV files
pub struct EspeakGenerator {
    /// Path to the espeak executable
    program: String,
}

impl EspeakGenerator {
    /// Create a generator, locating espeak when no program is given
    pub fn new(program: Option<&str>) -> Result<Self> {
        let program = match program {
            Some(p) => {
                if !probe_executable(p) {
                    return Err(RobopError::ExternalTool(format!("{} does not run", p)));
                }
                p.to_string()
            }
            None => Self::find_espeak()?,
        };
        debug!("Using TTS generator {}", program);
        Ok(Self { program })
    }

    /// Find an espeak executable
    fn find_espeak() -> Result<String> {
        ["espeak", "espeak-ng", "/usr/bin/espeak-ng"]
            .into_iter()
            .find(|p| probe_executable(p))
            .map(str::to_string)
            .ok_or_else(|| {
                RobopError::ExternalTool(
                    "espeak not found. Install with: sudo apt install espeak-ng".to_string(),
                )
            })
    }

    /// Command line arguments for a request (text goes on stdin)
    pub fn synth_args(request: &TtsRequest) -> Vec<String> {
        vec![
            "-s".to_string(),
            request.speed.to_string(),
            "-g".to_string(),
            request.gap.to_string(),
            "-p".to_string(),
            request.pitch.to_string(),
            "-a".to_string(),
            request.amp.to_string(),
            "-v".to_string(),
            request.voice.clone(),
            "-w".to_string(),
            request.output.to_string_lossy().into_owned(),
        ]
    }

    /// Argument for a voice listing
    pub fn voices_arg(language: Option<&str>) -> String {
        match language {
            Some(lang) => format!("--voices={}", lang),
            None => "--voices".to_string(),
        }
    }
}

impl SpeechGenerator for EspeakGenerator {
    fn synthesize(&mut self, request: &TtsRequest) -> Result<()> {
        let args = Self::synth_args(request);
        debug!("Command > {} {}", self.program, args.join(" "));

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn {}: {}", self.program, e);
                RobopError::ExternalTool(format!("Failed to start {}: {}", self.program, e))
            })?;

        feed_and_wait(child, &self.program, request.text.as_bytes())
    }

    fn list_voices(&mut self, language: Option<&str>) -> Result<String> {
        let output = Command::new(&self.program)
            .arg(Self::voices_arg(language))
            .output()
            .map_err(|e| {
                RobopError::ExternalTool(format!("Failed to start {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            return Err(RobopError::ExternalTool(format!(
                "{} --voices failed ({})",
                self.program, output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request() -> TtsRequest {
        TtsRequest {
            speed: 100,
            gap: 1,
            pitch: 70,
            amp: 200,
            voice: "mb/mb-us1".to_string(),
            output: PathBuf::from("/tmp/wav/tts_raw0.wav"),
            text: "-rf is not an option".to_string(),
        }
    }

    #[test]
    fn test_synth_args() {
        let args = EspeakGenerator::synth_args(&request());
        assert_eq!(
            args,
            [
                "-s", "100", "-g", "1", "-p", "70", "-a", "200", "-v", "mb/mb-us1", "-w",
                "/tmp/wav/tts_raw0.wav"
            ]
        );
    }

    #[test]
    fn test_text_is_not_an_argument() {
        let args = EspeakGenerator::synth_args(&request());
        assert!(!args.iter().any(|a| a.contains("option")));
    }

    #[test]
    fn test_voices_arg() {
        assert_eq!(EspeakGenerator::voices_arg(None), "--voices");
        assert_eq!(EspeakGenerator::voices_arg(Some("en")), "--voices=en");
    }

    #[test]
    fn test_create_espeak_generator() {
        match EspeakGenerator::new(None) {
            Ok(_) => println!("✓ espeak available"),
            Err(e) => println!("⚠ espeak not available: {}", e),
        }
    }
}
