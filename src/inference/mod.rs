//! Prediction orchestration, correction, class remapping and coverage statistics

/// Confidence correction and output validation
pub mod correction;
/// End-to-end inference pipeline
pub mod pipeline;
/// Raw-to-display class remapping
pub mod remap;
/// Coverage percentages
pub mod stats;

pub use pipeline::{InferencePipeline, PipelineConfig, Prediction};
pub use remap::{DisplayClass, DisplayMask};
pub use stats::ClassPercentages;
