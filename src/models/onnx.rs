//! ONNX Runtime model backend
//!
//! An exported model is a pair of graphs: the encoder at the configured path
//! and the decoder next to it as `<stem>.decoder.onnx`. Each graph has one
//! float input and one float output. Waveforms enter the encoder shaped
//! `[1, 1, samples]`.

use super::registry::{Latent, ModelLoader, Resynthesizer};
use super::spec::ModelSpec;
use crate::{Result, RobopError};
use log::debug;
use ndarray::{ArrayD, IxDyn};
use ort::{inputs, session::Session, value::TensorRef};
use std::path::{Path, PathBuf};

/// Loads exported models with ONNX Runtime
pub struct OnnxLoader;

impl OnnxLoader {
    fn decoder_path(encoder: &Path) -> PathBuf {
        let stem = encoder
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        encoder.with_file_name(format!("{}.decoder.onnx", stem))
    }

    fn open(spec: &ModelSpec, path: &Path) -> Result<Session> {
        let fail = |e: ort::Error| RobopError::ModelLoad {
            name: spec.name.clone(),
            reason: format!("{}: {}", path.display(), e),
        };
        debug!("Opening ONNX graph {}", path.display());
        Session::builder().map_err(fail)?.commit_from_file(path).map_err(fail)
    }
}

impl ModelLoader for OnnxLoader {
    fn load_realtime(&self, spec: &ModelSpec) -> Result<Box<dyn Resynthesizer>> {
        if spec.file_path.extension().and_then(|e| e.to_str()) != Some("onnx") {
            return Err(RobopError::ModelLoad {
                name: spec.name.clone(),
                reason: format!(
                    "{} is not an ONNX graph; export the model to .onnx first",
                    spec.file_path.display()
                ),
            });
        }

        let decoder_path = Self::decoder_path(&spec.file_path);
        if !decoder_path.is_file() {
            return Err(RobopError::ModelLoad {
                name: spec.name.clone(),
                reason: format!("decoder graph {} not found", decoder_path.display()),
            });
        }

        Ok(Box::new(OnnxModel {
            name: spec.name.clone(),
            encoder: Self::open(spec, &spec.file_path)?,
            decoder: Self::open(spec, &decoder_path)?,
        }))
    }

    fn load_checkpoint(&self, spec: &ModelSpec) -> Result<Box<dyn Resynthesizer>> {
        Err(RobopError::ModelLoad {
            name: spec.name.clone(),
            reason: format!(
                "{} is a training checkpoint; export it to ONNX first",
                spec.file_path.display()
            ),
        })
    }
}

struct OnnxModel {
    name: String,
    encoder: Session,
    decoder: Session,
}

/// Run a single-input, single-output graph
fn run_graph(name: &str, session: &mut Session, shape: &[usize], data: &[f32]) -> Result<Latent> {
    let fail = |e: String| RobopError::Other(format!("model {}: {}", name, e));

    let array =
        ArrayD::from_shape_vec(IxDyn(shape), data.to_vec()).map_err(|e| fail(e.to_string()))?;
    let tensor = TensorRef::from_array_view(array.view()).map_err(|e| fail(e.to_string()))?;
    let outputs = session
        .run(inputs![tensor])
        .map_err(|e| fail(e.to_string()))?;

    let (out_shape, out_data) = outputs[0]
        .try_extract_tensor::<f32>()
        .map_err(|e| fail(e.to_string()))?;
    Ok(Latent {
        data: out_data.to_vec(),
        shape: out_shape.iter().map(|&d| d.max(0) as usize).collect(),
    })
}

impl Resynthesizer for OnnxModel {
    fn encode(&mut self, waveform: &[f32]) -> Result<Latent> {
        run_graph(&self.name, &mut self.encoder, &[1, 1, waveform.len()], waveform)
    }

    fn decode(&mut self, latent: &Latent) -> Result<Vec<f32>> {
        run_graph(&self.name, &mut self.decoder, &latent.shape, &latent.data).map(|out| out.data)
    }
}
