//! Error types and request-boundary status mapping for pipeline operations

use crate::model::version::ModelVersion;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Reason an input payload was rejected before inference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputKind {
    /// No file was supplied, or the supplied payload was empty
    MissingFile,

    /// Array rank or spatial dimensions cannot form an input tensor
    InvalidShape {
        /// Shape of the rejected array
        shape: Vec<usize>,
    },

    /// Last array dimension is not the expected band count
    InvalidChannelCount {
        /// Band count the models require
        expected: usize,
        /// Band count found in the payload
        found: usize,
    },

    /// Payload bytes could not be decoded
    DecodeFailure {
        /// Format the decoder attempted
        format: &'static str,
        /// Underlying decoder message
        reason: String,
    },
}

impl fmt::Display for InvalidInputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile => write!(f, "no file provided"),
            Self::InvalidShape { shape } => {
                write!(f, "expected an (H, W, C) array, got shape {shape:?}")
            }
            Self::InvalidChannelCount { expected, found } => {
                write!(f, "expected {expected} channels, got {found}")
            }
            Self::DecodeFailure { format, reason } => {
                write!(f, "invalid {format} payload: {reason}")
            }
        }
    }
}

/// Why a prediction call did not produce a usable result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceFailureReason {
    /// The model provider reported an error
    Provider(String),
    /// The model provider did not answer within the allotted time
    Timeout(Duration),
    /// The model provider answered with an unusable tensor
    InvalidOutput(String),
}

impl fmt::Display for InferenceFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(reason) => write!(f, "{reason}"),
            Self::Timeout(limit) => write!(f, "timeout after {}ms", limit.as_millis()),
            Self::InvalidOutput(reason) => write!(f, "invalid model output: {reason}"),
        }
    }
}

/// Main error type for all pipeline operations
#[derive(Debug)]
pub enum CloudMaskError {
    /// Input payload is missing, malformed or has the wrong band count
    InvalidInput {
        /// What was wrong with the payload
        kind: InvalidInputKind,
    },

    /// Requested model type is not one of the known versions
    UnsupportedVersion {
        /// The rejected model type string
        value: String,
    },

    /// Model artifact is missing or could not be turned into a provider
    ModelUnavailable {
        /// Version whose provider was requested
        version: ModelVersion,
        /// Resolved artifact location
        path: PathBuf,
        /// Description of the failure
        reason: String,
    },

    /// Model provider failed or timed out during prediction
    InferenceFailure {
        /// Version whose provider was called
        version: ModelVersion,
        /// What went wrong
        reason: InferenceFailureReason,
    },

    /// A rendered artifact could not be encoded
    Encoding {
        /// Name of the artifact being encoded
        artifact: &'static str,
        /// Underlying encoder error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Transport-neutral status class used at the request boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    /// The caller sent something unusable (HTTP 400)
    BadRequest,
    /// A model could not be provided right now; retry later (HTTP 503)
    ServiceUnavailable,
    /// The pipeline failed while processing a valid request (HTTP 500)
    InternalError,
}

impl ErrorStatus {
    /// HTTP status code equivalent
    pub const fn code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::ServiceUnavailable => 503,
            Self::InternalError => 500,
        }
    }
}

impl CloudMaskError {
    /// Status class this error surfaces as
    pub const fn status(&self) -> ErrorStatus {
        match self {
            Self::InvalidInput { .. } | Self::UnsupportedVersion { .. } => ErrorStatus::BadRequest,
            Self::ModelUnavailable { .. } => ErrorStatus::ServiceUnavailable,
            Self::InferenceFailure { .. } | Self::Encoding { .. } | Self::FileSystem { .. } => {
                ErrorStatus::InternalError
            }
        }
    }

    /// Whether the same request may succeed when retried later
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ModelUnavailable { .. })
    }
}

impl fmt::Display for CloudMaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { kind } => write!(f, "Invalid input: {kind}"),
            Self::UnsupportedVersion { value } => {
                write!(f, "Unsupported model type '{value}' (expected v1, v2 or v3)")
            }
            Self::ModelUnavailable {
                version,
                path,
                reason,
            } => {
                write!(
                    f,
                    "Model {version} not loaded from '{}': {reason}",
                    path.display()
                )
            }
            Self::InferenceFailure { version, reason } => {
                write!(f, "Inference with model {version} failed: {reason}")
            }
            Self::Encoding { artifact, source } => {
                write!(f, "Failed to encode {artifact}: {source}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for CloudMaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encoding { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for pipeline results
pub type Result<T> = std::result::Result<T, CloudMaskError>;

/// Create an invalid input error
pub const fn invalid_input(kind: InvalidInputKind) -> CloudMaskError {
    CloudMaskError::InvalidInput { kind }
}

/// Create a decode failure error for the named format
pub fn decode_failure(format: &'static str, reason: &impl ToString) -> CloudMaskError {
    invalid_input(InvalidInputKind::DecodeFailure {
        format,
        reason: reason.to_string(),
    })
}

/// Create an inference failure caused by the provider itself
pub fn provider_failure(version: ModelVersion, reason: &impl ToString) -> CloudMaskError {
    CloudMaskError::InferenceFailure {
        version,
        reason: InferenceFailureReason::Provider(reason.to_string()),
    }
}

/// Create an inference failure for an unusable provider output
pub fn invalid_output(version: ModelVersion, reason: &impl ToString) -> CloudMaskError {
    CloudMaskError::InferenceFailure {
        version,
        reason: InferenceFailureReason::InvalidOutput(reason.to_string()),
    }
}
