//! Neural resynthesis models

pub mod registry;
pub mod spec;

#[cfg(feature = "onnx")]
pub mod onnx;

pub use registry::{
    default_loader, Latent, LoadedModel, ModelLoader, ModelRegistry, Resynthesizer,
    UnavailableLoader,
};
pub use spec::{ModelEntry, ModelFormat, ModelSpec};
