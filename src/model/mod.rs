//! Model metadata, provider capability and the per-version registry

/// ONNX Runtime provider
#[cfg(feature = "onnx")]
pub mod onnx;
/// Model provider capability and time-bounded prediction
pub mod provider;
/// Memoized per-version access to model providers
pub mod registry;
/// Static per-version metadata table
pub mod version;

pub use provider::{RawPrediction, SegmentationModel};
pub use registry::{ArtifactPaths, ModelLoader, ModelRegistry};
pub use version::{ModelVersion, VersionConfig};

/// Loader for the model runtime this build was compiled with
pub fn default_loader() -> Box<dyn ModelLoader> {
    #[cfg(feature = "onnx")]
    {
        Box::new(onnx::OnnxLoader)
    }
    #[cfg(not(feature = "onnx"))]
    {
        Box::new(registry::NoRuntimeLoader)
    }
}
