//! Post-processing renderers for masks, previews, corrections and heatmaps

/// Shared scaling and PNG/base64 helpers
pub mod encode;
/// Solar potential heatmap
pub mod heatmap;
/// Grayscale mask encoding
pub mod mask;
/// Input preview rendering
pub mod preview;
/// Statistical shadow mitigation
pub mod shadow;
