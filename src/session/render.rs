//! Render pipeline
//!
//! text -> TTS generator -> raw WAV -> (play raw) -> resynthesis -> (play)

use crate::audio::{load_mono, Player};
use crate::resynth::{ResynthesisEngine, Resynthesized};
use crate::speech::{OutputWait, SpeechGenerator, TtsRequest};
use crate::state::SessionState;
use crate::Result;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything produced for one utterance
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    pub source_text: String,
    pub raw_file_path: PathBuf,
    /// One entry per model run, empty when resynthesis is off
    pub resynth: Vec<Resynthesized>,
}

impl RenderResult {
    pub fn resynth_file_paths(&self) -> Vec<&Path> {
        self.resynth.iter().map(|r| r.path.as_path()).collect()
    }

    pub fn resynth_waveforms(&self) -> Vec<&[f32]> {
        self.resynth.iter().map(|r| r.waveform.as_slice()).collect()
    }
}

pub struct RenderPipeline {
    generator: Box<dyn SpeechGenerator>,
    player: Box<dyn Player>,
    engine: ResynthesisEngine,
    scratch_dir: PathBuf,
    /// Rate raw TTS output is loaded at
    sample_rate: u32,
    wait: OutputWait,
}

impl RenderPipeline {
    pub fn new(
        generator: Box<dyn SpeechGenerator>,
        player: Box<dyn Player>,
        engine: ResynthesisEngine,
        scratch_dir: impl Into<PathBuf>,
        sample_rate: u32,
    ) -> Self {
        Self {
            generator,
            player,
            engine,
            scratch_dir: scratch_dir.into(),
            sample_rate,
            wait: OutputWait::default(),
        }
    }

    pub fn with_output_wait(mut self, wait: OutputWait) -> Self {
        self.wait = wait;
        self
    }

    /// Raw TTS file for a sequence number
    pub fn raw_path(&self, sequence: u64) -> PathBuf {
        self.scratch_dir.join(format!("tts_raw{}.wav", sequence))
    }

    /// Speak `text` with the session's current parameters
    ///
    /// The file sequence advances even when a later stage fails, so a
    /// failed utterance never leaves a file to be overwritten.
    pub fn render(&mut self, state: &mut SessionState, text: &str) -> Result<RenderResult> {
        let raw = self.raw_path(state.next_file_sequence());

        let request = TtsRequest::from_state(state, text, &raw);
        self.generator.synthesize(&request)?;
        self.wait.wait_for(&raw)?;
        info!("Wrote file: {}", raw.display());

        if state.play_raw() {
            let samples = load_mono(&raw, self.sample_rate)?;
            debug!("Playing raw TTS ({} samples)", samples.len());
            self.player.play(&samples, self.sample_rate)?;
        }

        let mut resynth = Vec::new();
        if state.play_rave() {
            let models = [state.model().to_string()];
            resynth = self.engine.run(&raw, self.sample_rate, Some(&models))?;
            for output in &resynth {
                debug!("Playing {} output", output.model);
                self.player.play(&output.waveform, output.sample_rate)?;
            }
        }

        Ok(RenderResult {
            source_text: text.to_string(),
            raw_file_path: raw,
            resynth,
        })
    }

    /// The generator, for voice listings
    pub fn generator_mut(&mut self) -> &mut dyn SpeechGenerator {
        self.generator.as_mut()
    }

    pub fn engine(&self) -> &ResynthesisEngine {
        &self.engine
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }
}

/// Turn a configured scratch path into a usable directory
///
/// A path that looks like a file (has an extension) is replaced by its
/// parent. Missing directories are created.
pub fn prepare_scratch_dir(path: &Path) -> Result<PathBuf> {
    let dir = if path.extension().is_some() {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        warn!(
            "Scratch path {} looks like a file, using {}",
            path.display(),
            parent.display()
        );
        parent.to_path_buf()
    } else {
        path.to_path_buf()
    };

    if !dir.exists() {
        warn!("Scratch directory {} does not exist, creating it", dir.display());
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}
