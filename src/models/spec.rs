//! Model table entries and resolved model specs

use crate::{Result, RobopError};
use std::path::{Path, PathBuf};

/// How a model file is loaded, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// Exported, inference-only graph (`.ts`, `.onnx`)
    Realtime,
    /// Training checkpoint (anything else)
    Checkpoint,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") | Some("onnx") => ModelFormat::Realtime,
            _ => ModelFormat::Checkpoint,
        }
    }
}

/// One row of the model table, as configured
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    pub name: String,
    /// Path relative to the model root
    pub relative_path: PathBuf,
    pub sample_rate: u32,
    pub latency_seconds: f64,
}

impl ModelEntry {
    pub fn new(
        name: impl Into<String>,
        relative_path: impl Into<PathBuf>,
        sample_rate: u32,
        latency_seconds: f64,
    ) -> Self {
        Self {
            name: name.into(),
            relative_path: relative_path.into(),
            sample_rate,
            latency_seconds,
        }
    }

    /// Parse `relative/path, sample_rate, latency_seconds`
    pub fn parse(name: &str, value: &str) -> Result<Self> {
        let bad = |what: &str| {
            RobopError::Config(format!(
                "model '{}': {} in '{}' (expected: path, sample_rate, latency_seconds)",
                name, what, value
            ))
        };

        let fields: Vec<&str> = value.split(',').map(str::trim).collect();
        let [path, rate, latency] = fields.as_slice() else {
            return Err(bad("wrong number of fields"));
        };
        if path.is_empty() {
            return Err(bad("empty path"));
        }
        let sample_rate = rate.parse().map_err(|_| bad("invalid sample rate"))?;
        let latency_seconds = latency.parse().map_err(|_| bad("invalid latency"))?;

        Ok(Self::new(name, *path, sample_rate, latency_seconds))
    }
}

/// Resolved, validated description of a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub name: String,
    pub file_path: PathBuf,
    pub sample_rate: u32,
    pub latency_seconds: f64,
    pub is_realtime_format: bool,
}

impl ModelSpec {
    /// Resolve an entry against the model root and validate it
    pub fn resolve(entry: &ModelEntry, root: &Path) -> Result<Self> {
        let fail = |reason: String| RobopError::ModelLoad {
            name: entry.name.clone(),
            reason,
        };

        if entry.sample_rate == 0 {
            return Err(fail("sample rate must be > 0".to_string()));
        }
        if !entry.latency_seconds.is_finite() || entry.latency_seconds < 0.0 {
            return Err(fail(format!(
                "latency must be >= 0 seconds, got {}",
                entry.latency_seconds
            )));
        }

        let file_path = root.join(&entry.relative_path);
        Ok(Self {
            name: entry.name.clone(),
            is_realtime_format: ModelFormat::from_path(&file_path) == ModelFormat::Realtime,
            file_path,
            sample_rate: entry.sample_rate,
            latency_seconds: entry.latency_seconds,
        })
    }

    pub fn format(&self) -> ModelFormat {
        if self.is_realtime_format {
            ModelFormat::Realtime
        } else {
            ModelFormat::Checkpoint
        }
    }

    /// Samples dropped from the start of decoded audio
    pub fn latency_samples(&self) -> usize {
        (self.sample_rate as f64 * self.latency_seconds).floor() as usize
    }
}
