//! Resynthesis engine
//!
//! Runs a WAV file through one or more registered models. Each model gets
//! the whole waveform at once (encode, then decode; no streaming), and its
//! output is shifted earlier by the model's known latency.

use crate::audio::resample::resample;
use crate::audio::{load_mono, write_wav};
use crate::models::ModelRegistry;
use crate::{Result, RobopError};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Output of one model for one input file
#[derive(Debug, Clone, PartialEq)]
pub struct Resynthesized {
    pub model: String,
    pub path: PathBuf,
    pub waveform: Vec<f32>,
    /// Rate the waveform was written at (the model's native rate)
    pub sample_rate: u32,
}

/// Shift `decoded` left by `remove` samples and zero the vacated tail
///
/// The length is unchanged: `decoded[i] = old[i + remove]` for
/// `i < len - remove`, and the last `remove` samples become `0.0`.
/// A window covering the whole waveform is a boundary error.
pub fn compensate_latency(model: &str, decoded: &mut [f32], remove: usize) -> Result<()> {
    if remove == 0 {
        return Ok(());
    }

    let len = decoded.len();
    if remove >= len {
        return Err(RobopError::Boundary {
            model: model.to_string(),
            remove,
            len,
        });
    }

    decoded.copy_within(remove.., 0);
    decoded[len - remove..].fill(0.0);
    Ok(())
}

/// Applies registered models to audio files
///
/// Models see their input at their own sample rate; input loaded at a
/// different rate is resampled per model.
pub struct ResynthesisEngine {
    registry: ModelRegistry,
    output_dir: PathBuf,
}

impl ResynthesisEngine {
    /// Create an engine writing its output files to `output_dir`
    pub fn new(registry: ModelRegistry, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            output_dir: output_dir.into(),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Output file for an input file and model: `<stem>_rave_<model>.wav`
    pub fn output_path(&self, input: &Path, model: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir.join(format!("{}_rave_{}.wav", stem, model))
    }

    /// Resynthesize `input` with each named model, in the given order
    ///
    /// `None` means every registered model in registration order. All names
    /// are checked before any model runs, so an unknown name fails the whole
    /// call without writing anything.
    pub fn run(
        &mut self,
        input: &Path,
        input_rate: u32,
        models: Option<&[String]>,
    ) -> Result<Vec<Resynthesized>> {
        let names: Vec<String> = match models {
            Some(names) => names.to_vec(),
            None => self.registry.names(),
        };

        if let Some(missing) = names.iter().find(|n| !self.registry.contains(n)) {
            return Err(RobopError::ModelLookup(missing.clone()));
        }

        let waveform = load_mono(input, input_rate)?;
        debug!(
            "Resynthesizing {} ({} samples) with {:?}",
            input.display(),
            waveform.len(),
            names
        );

        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let path = self.output_path(input, &name);
            let model = self
                .registry
                .get_mut(&name)
                .ok_or_else(|| RobopError::ModelLookup(name.clone()))?;

            let model_rate = model.spec().sample_rate;
            let latent = if model_rate == input_rate {
                model.encode(&waveform)?
            } else {
                debug!("Resampling {} Hz input to {} Hz for {}", input_rate, model_rate, name);
                let resampled = resample(waveform.clone(), input_rate, model_rate)
                    .map_err(|e| RobopError::audio(input, e))?;
                model.encode(&resampled)?
            };
            let mut decoded = model.decode(&latent)?;

            let spec = model.spec();
            if spec.latency_seconds > 0.0 {
                compensate_latency(&name, &mut decoded, spec.latency_samples())?;
            }

            write_wav(&path, &decoded, spec.sample_rate)?;
            info!("Wrote file: {}", path.display());

            results.push(Resynthesized {
                sample_rate: spec.sample_rate,
                model: name,
                path,
                waveform: decoded,
            });
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_window_is_noop() {
        let mut samples = vec![1.0, 2.0, 3.0];
        compensate_latency("m", &mut samples, 0).unwrap();
        assert_eq!(samples, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_shift_and_zero() {
        let mut samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        compensate_latency("m", &mut samples, 2).unwrap();
        assert_eq!(samples, [3.0, 4.0, 5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_window_equal_to_length() {
        let mut samples = vec![1.0, 2.0, 3.0];
        let err = compensate_latency("m", &mut samples, 3).unwrap_err();
        assert!(matches!(err, RobopError::Boundary { remove: 3, len: 3, .. }));
        assert_eq!(samples, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_window_longer_than_waveform() {
        let mut samples = vec![1.0, 2.0];
        let err = compensate_latency("m", &mut samples, 10).unwrap_err();
        assert!(matches!(err, RobopError::Boundary { remove: 10, len: 2, .. }));
    }

    #[test]
    fn test_output_path() {
        let engine = ResynthesisEngine::new(ModelRegistry::new(), "/tmp/wav");
        assert_eq!(
            engine.output_path(Path::new("/tmp/wav/tts_raw3.wav"), "human"),
            PathBuf::from("/tmp/wav/tts_raw3_rave_human.wav")
        );
    }
}
