//! Registry of loaded resynthesis models

use super::spec::{ModelEntry, ModelFormat, ModelSpec};
use crate::{Result, RobopError};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

/// Latent representation produced by a model's encoder
#[derive(Debug, Clone, PartialEq)]
pub struct Latent {
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
}

/// Encode/decode capability of a neural resynthesis model
///
/// Implementations take a whole mono waveform at the model's sample rate.
pub trait Resynthesizer {
    /// Encode a waveform into its latent representation
    fn encode(&mut self, waveform: &[f32]) -> Result<Latent>;

    /// Decode a latent representation back into a waveform
    fn decode(&mut self, latent: &Latent) -> Result<Vec<f32>>;
}

/// Constructs model handles from files
///
/// The registry picks the method from the model file's extension.
pub trait ModelLoader {
    /// Load an exported, inference-only model
    fn load_realtime(&self, spec: &ModelSpec) -> Result<Box<dyn Resynthesizer>>;

    /// Load a training checkpoint
    fn load_checkpoint(&self, spec: &ModelSpec) -> Result<Box<dyn Resynthesizer>>;
}

/// Loader used when the crate is built without a model backend
pub struct UnavailableLoader;

impl UnavailableLoader {
    fn refuse(spec: &ModelSpec) -> RobopError {
        RobopError::ModelLoad {
            name: spec.name.clone(),
            reason: "robop was built without a model backend (rebuild with --features onnx)"
                .to_string(),
        }
    }
}

impl ModelLoader for UnavailableLoader {
    fn load_realtime(&self, spec: &ModelSpec) -> Result<Box<dyn Resynthesizer>> {
        Err(Self::refuse(spec))
    }

    fn load_checkpoint(&self, spec: &ModelSpec) -> Result<Box<dyn Resynthesizer>> {
        Err(Self::refuse(spec))
    }
}

/// Loader for the backend this binary was built with
pub fn default_loader() -> Box<dyn ModelLoader> {
    #[cfg(feature = "onnx")]
    {
        Box::new(super::onnx::OnnxLoader)
    }
    #[cfg(not(feature = "onnx"))]
    {
        Box::new(UnavailableLoader)
    }
}

/// A model spec together with its handle
pub struct LoadedModel {
    spec: ModelSpec,
    handle: Box<dyn Resynthesizer>,
}

impl LoadedModel {
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub(crate) fn encode(&mut self, waveform: &[f32]) -> Result<Latent> {
        self.handle.encode(waveform)
    }

    pub(crate) fn decode(&mut self, latent: &Latent) -> Result<Vec<f32>> {
        self.handle.decode(latent)
    }
}

/// Named models in insertion order
///
/// Populated once at startup. Registering a name again replaces the earlier
/// model but keeps its position.
#[derive(Default)]
pub struct ModelRegistry {
    models: Vec<LoadedModel>,
    index: HashMap<String, usize>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every entry of a model table
    ///
    /// Stops at the first model that cannot be loaded.
    pub fn load(
        &mut self,
        entries: &[ModelEntry],
        root: &Path,
        loader: &dyn ModelLoader,
    ) -> Result<()> {
        for entry in entries {
            let spec = ModelSpec::resolve(entry, root)?;

            if !spec.file_path.is_file() {
                return Err(RobopError::ModelLoad {
                    name: spec.name.clone(),
                    reason: format!("model file {} not found", spec.file_path.display()),
                });
            }

            info!(
                "Loading model {} from {} ({} Hz, latency {} s)",
                spec.name,
                spec.file_path.display(),
                spec.sample_rate,
                spec.latency_seconds
            );
            let handle = match spec.format() {
                ModelFormat::Realtime => loader.load_realtime(&spec)?,
                ModelFormat::Checkpoint => loader.load_checkpoint(&spec)?,
            };
            self.insert(spec, handle);
        }
        Ok(())
    }

    /// Build a registry from a model table
    ///
    /// A configured table must load completely. The built-in table
    /// (`required == false`) is allowed to fail: the error is logged and an
    /// empty registry is returned, leaving the session on raw TTS.
    pub fn load_table(
        entries: &[ModelEntry],
        root: &Path,
        loader: &dyn ModelLoader,
        required: bool,
    ) -> Result<Self> {
        let mut registry = Self::new();
        match registry.load(entries, root, loader) {
            Ok(()) => Ok(registry),
            Err(e) if !required => {
                warn!("Built-in models unavailable, resynthesis disabled: {}", e);
                Ok(Self::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Register a model under its spec's name
    pub fn insert(&mut self, spec: ModelSpec, handle: Box<dyn Resynthesizer>) {
        let model = LoadedModel { spec, handle };
        match self.index.get(&model.spec.name) {
            Some(&pos) => {
                debug!("Replacing model {}", model.spec.name);
                self.models[pos] = model;
            }
            None => {
                self.index.insert(model.spec.name.clone(), self.models.len());
                self.models.push(model);
            }
        }
    }

    /// Model names in insertion order
    pub fn names(&self) -> Vec<String> {
        self.models.iter().map(|m| m.spec.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn spec(&self, name: &str) -> Option<&ModelSpec> {
        self.index.get(name).map(|&pos| &self.models[pos].spec)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut LoadedModel> {
        let pos = *self.index.get(name)?;
        self.models.get_mut(pos)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
