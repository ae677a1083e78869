//! Transport-neutral request and response payloads

use crate::inference::stats::ClassPercentages;
use crate::io::configuration::DEFAULT_MODEL_TYPE;
use crate::io::error::{CloudMaskError, ErrorStatus, InvalidInputKind, Result, invalid_input};
use crate::model::version::ModelVersion;
use crate::preprocess::input::RawInput;
use serde::{Deserialize, Serialize};

/// An uploaded file plus the requested model type
#[derive(Debug, Clone, Default)]
pub struct InferenceRequest {
    /// Uploaded payload, if any
    pub file: Option<RawInput>,
    /// Requested model type (`"v1"`, `"v2"` or `"v3"`)
    pub model_type: Option<String>,
}

impl InferenceRequest {
    /// Request for `file` with the default model type
    pub const fn new(file: RawInput) -> Self {
        Self {
            file: Some(file),
            model_type: None,
        }
    }

    /// Request a specific model type
    #[must_use]
    pub fn with_model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = Some(model_type.into());
        self
    }

    /// Requested version, defaulting to v2
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedVersion` for an unknown model type
    pub fn version(&self) -> Result<ModelVersion> {
        self.model_type
            .as_deref()
            .unwrap_or(DEFAULT_MODEL_TYPE)
            .parse()
    }

    /// Uploaded file
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput(MissingFile)` when no non-empty file was supplied
    pub fn file(&self) -> Result<&RawInput> {
        self.file
            .as_ref()
            .filter(|file| !file.is_empty())
            .ok_or_else(|| invalid_input(InvalidInputKind::MissingFile))
    }
}

/// Result of a segmentation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResponse {
    /// Base64 grayscale PNG of the display mask
    pub mask: String,
    /// Coverage per display class
    pub percentages: ClassPercentages,
    /// Whether shadow coverage exceeds the presence threshold
    pub has_shadow: bool,
    /// Model type that produced the mask
    pub model_used: String,
    /// `data:` URI of the input preview
    pub original_image_url: String,
}

/// Result of a shadow mitigation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitigationResponse {
    /// Base64 PNG of the corrected image
    pub mitigated_image: String,
}

/// Result of a solar potential request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapResponse {
    /// Base64 PNG of the false-color heatmap
    pub heatmap_image: String,
}

/// Body returned for any failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error message
    pub error: String,
}

impl ErrorBody {
    /// Status and body for `error`
    pub fn from_error(error: &CloudMaskError) -> (ErrorStatus, Self) {
        (
            error.status(),
            Self {
                error: error.to_string(),
            },
        )
    }
}
