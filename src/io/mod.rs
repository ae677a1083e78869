//! Input/output: errors, configuration, payloads, logging and the CLI

/// Command-line batch processing
pub mod cli;
/// Constants and runtime defaults
pub mod configuration;
/// Error taxonomy and status mapping
pub mod error;
/// Tracing subscriber setup
pub mod logging;
/// Request and response payloads
pub mod payload;
/// Multi-file progress display
pub mod progress;
