//! Cloud and cloud-shadow segmentation for satellite imagery
//!
//! Uploaded images or 8-band arrays are normalized into the model input
//! tensor, segmented by one of three model generations, and turned into a
//! four-class display mask with coverage statistics. The same mask drives a
//! statistical shadow correction and a solar potential heatmap.

#![deny(unsafe_code)]

/// Prediction orchestration, confidence correction, class remapping and statistics
pub mod inference;
/// Input/output operations and error handling
pub mod io;
/// Model metadata, providers and the lazily populated registry
pub mod model;
/// Input modality detection and tensor normalization
pub mod preprocess;
/// Mask, preview, shadow correction and heatmap rendering
pub mod render;

pub use inference::{InferencePipeline, PipelineConfig};
pub use io::error::{CloudMaskError, Result};
pub use model::{ModelRegistry, ModelVersion};
