//! Audio playback
//!
//! Playback goes through a small trait so the session can run with any
//! output: an external player process, or nothing at all.

use super::io::encode_wav;
use crate::platform::{feed_and_wait, probe_executable, setup_pulseaudio};
use crate::{Result, RobopError};
use log::{debug, info};
use std::process::{Command, Stdio};

/// Something that can play a mono waveform
pub trait Player {
    /// Play samples at the given rate, blocking until playback finishes
    fn play(&mut self, waveform: &[f32], sample_rate: u32) -> Result<()>;
}

/// Player that discards audio
pub struct NullPlayer;

impl Player for NullPlayer {
    fn play(&mut self, waveform: &[f32], sample_rate: u32) -> Result<()> {
        debug!(
            "Audio output disabled, skipping {} samples at {} Hz",
            waveform.len(),
            sample_rate
        );
        Ok(())
    }
}

/// How audio is handed to the player process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StdinFormat {
    /// Complete WAV file
    Wav,
    /// Headerless little-endian f32 samples
    RawFloat,
}

/// Player that pipes audio into an external program
pub struct CommandPlayer {
    program: String,
    format: StdinFormat,
}

impl CommandPlayer {
    /// ALSA `aplay`, fed a WAV file on stdin
    pub fn aplay() -> Result<Self> {
        if !probe_executable("aplay") {
            return Err(RobopError::ExternalTool(
                "aplay not found. Install with: sudo apt install alsa-utils".to_string(),
            ));
        }
        Ok(Self {
            program: "aplay".to_string(),
            format: StdinFormat::Wav,
        })
    }

    /// PulseAudio `paplay`, fed raw float samples on stdin
    pub fn paplay() -> Result<Self> {
        setup_pulseaudio()?;
        if !probe_executable("paplay") {
            return Err(RobopError::ExternalTool(
                "paplay not found. Install with: sudo apt install pulseaudio-utils".to_string(),
            ));
        }
        Ok(Self {
            program: "paplay".to_string(),
            format: StdinFormat::RawFloat,
        })
    }

    fn args(&self, sample_rate: u32) -> Vec<String> {
        match self.format {
            StdinFormat::Wav => vec!["-q".to_string(), "-".to_string()],
            StdinFormat::RawFloat => vec![
                "--raw".to_string(),
                "--format=float32le".to_string(),
                format!("--rate={}", sample_rate),
                "--channels=1".to_string(),
            ],
        }
    }

    fn payload(&self, waveform: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
        match self.format {
            StdinFormat::Wav => encode_wav(waveform, sample_rate),
            StdinFormat::RawFloat => Ok(waveform.iter().flat_map(|s| s.to_le_bytes()).collect()),
        }
    }
}

impl Player for CommandPlayer {
    fn play(&mut self, waveform: &[f32], sample_rate: u32) -> Result<()> {
        let payload = self.payload(waveform, sample_rate)?;
        debug!(
            "Playing {} samples at {} Hz with {}",
            waveform.len(),
            sample_rate,
            self.program
        );

        let child = Command::new(&self.program)
            .args(self.args(sample_rate))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                RobopError::ExternalTool(format!("Failed to start {}: {}", self.program, e))
            })?;

        feed_and_wait(child, &self.program, &payload)
    }
}

/// Create the player named in the configuration
///
/// `auto` tries aplay, then paplay, then falls back to no audio.
pub fn create_player(choice: &str) -> Result<Box<dyn Player>> {
    match choice {
        "none" => Ok(Box::new(NullPlayer)),
        "aplay" => Ok(Box::new(CommandPlayer::aplay()?)),
        "paplay" => Ok(Box::new(CommandPlayer::paplay()?)),
        "auto" => {
            match CommandPlayer::aplay() {
                Ok(player) => {
                    info!("Using aplay for playback");
                    return Ok(Box::new(player));
                }
                Err(e) => info!("aplay unavailable: {}", e),
            }
            match CommandPlayer::paplay() {
                Ok(player) => {
                    info!("Using paplay for playback");
                    Ok(Box::new(player))
                }
                Err(e) => {
                    info!("paplay unavailable: {}", e);
                    log::warn!("No audio player found, audio output disabled");
                    Ok(Box::new(NullPlayer))
                }
            }
        }
        other => Err(RobopError::Config(format!(
            "unknown player '{}' (expected auto, aplay, paplay or none)",
            other
        ))),
    }
}
