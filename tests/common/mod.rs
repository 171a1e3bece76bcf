//! Shared fakes for integration tests
//!
//! None of these touch espeak, audio devices or real model files.

#![allow(dead_code)]

use robop::audio::{write_wav, Player};
use robop::models::{Latent, ModelEntry, ModelRegistry, ModelSpec, Resynthesizer};
use robop::speech::{SpeechGenerator, TtsRequest};
use robop::{Result, RobopError};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

pub const RATE: u32 = 1000;

/// A short ramp, exactly representable as 16-bit PCM
pub fn ramp(len: usize) -> Vec<f32> {
    (0..len).map(|i| (i % 64) as f32 / 128.0).collect()
}

/// Generator that writes a fixed waveform instead of speaking
pub struct FakeGenerator {
    pub samples: Vec<f32>,
    pub fail: bool,
    pub requests: Rc<RefCell<Vec<TtsRequest>>>,
}

impl FakeGenerator {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            fail: false,
            requests: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }
}

impl SpeechGenerator for FakeGenerator {
    fn synthesize(&mut self, request: &TtsRequest) -> Result<()> {
        self.requests.borrow_mut().push(request.clone());
        if self.fail {
            return Err(RobopError::ExternalTool("generator exploded".to_string()));
        }
        write_wav(&request.output, &self.samples, RATE)
    }

    fn list_voices(&mut self, language: Option<&str>) -> Result<String> {
        Ok(format!("Pty Language Age/Gender VoiceName ({})\n", language.unwrap_or("all")))
    }
}

/// Player that remembers what it was asked to play
#[derive(Clone, Default)]
pub struct RecordingPlayer {
    pub played: Rc<RefCell<Vec<(Vec<f32>, u32)>>>,
}

impl Player for RecordingPlayer {
    fn play(&mut self, samples: &[f32], sample_rate: u32) -> Result<()> {
        self.played.borrow_mut().push((samples.to_vec(), sample_rate));
        Ok(())
    }
}

/// Model whose decoder delays its input by a fixed number of samples
pub struct DelayModel {
    pub delay: usize,
}

impl Resynthesizer for DelayModel {
    fn encode(&mut self, waveform: &[f32]) -> Result<Latent> {
        Ok(Latent {
            data: waveform.to_vec(),
            shape: vec![1, 1, waveform.len()],
        })
    }

    fn decode(&mut self, latent: &Latent) -> Result<Vec<f32>> {
        let len = latent.data.len();
        let mut out = vec![0.0; len];
        if self.delay < len {
            out[self.delay..].copy_from_slice(&latent.data[..len - self.delay]);
        }
        Ok(out)
    }
}

/// Model that scales its input, to tell models apart in outputs
pub struct GainModel {
    pub gain: f32,
}

impl Resynthesizer for GainModel {
    fn encode(&mut self, waveform: &[f32]) -> Result<Latent> {
        Ok(Latent {
            data: waveform.to_vec(),
            shape: vec![1, 1, waveform.len()],
        })
    }

    fn decode(&mut self, latent: &Latent) -> Result<Vec<f32>> {
        Ok(latent.data.iter().map(|s| s * self.gain).collect())
    }
}

pub fn spec(name: &str, sample_rate: u32, latency_seconds: f64) -> ModelSpec {
    let entry = ModelEntry::new(name, &format!("{}.ts", name), sample_rate, latency_seconds);
    ModelSpec::resolve(&entry, Path::new("/models")).expect("valid spec")
}

/// Registry with `human` (gain 0.5) and `machine` (gain 0.25), no latency
pub fn two_model_registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry.insert(spec("human", RATE, 0.0), Box::new(GainModel { gain: 0.5 }));
    registry.insert(spec("machine", RATE, 0.0), Box::new(GainModel { gain: 0.25 }));
    registry
}
