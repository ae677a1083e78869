//! Static per-generation model metadata

use crate::io::configuration::{
    DEFAULT_ARTIFACT_V1, DEFAULT_ARTIFACT_V2, DEFAULT_ARTIFACT_V3, INPUT_CHANNELS, INPUT_SIZE,
    MODEL_PATH_V1_ENV, MODEL_PATH_V2_ENV, MODEL_PATH_V3_ENV, RAW_CLASS_COUNT,
};
use crate::io::error::CloudMaskError;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Trained model generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelVersion {
    /// Legacy model
    V1,
    /// Advanced model, the default
    V2,
    /// Balanced model
    V3,
}

impl ModelVersion {
    /// All known versions in table order
    pub const ALL: [Self; 3] = [Self::V1, Self::V2, Self::V3];

    /// Wire name used in requests and responses
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V3 => "v3",
        }
    }

    /// Metadata for this version
    pub fn config(self) -> &'static VersionConfig {
        let [v1, v2, v3] = &*VERSION_TABLE;
        match self {
            Self::V1 => v1,
            Self::V2 => v2,
            Self::V3 => v3,
        }
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVersion {
    type Err = CloudMaskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            "v3" => Ok(Self::V3),
            _ => Err(CloudMaskError::UnsupportedVersion {
                value: value.to_string(),
            }),
        }
    }
}

/// Post-hoc multiplicative penalty on one raw class channel
///
/// Applied to the model output before remapping and never renormalized, so
/// corrected per-pixel values no longer sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceCorrection {
    /// Raw class channel to scale
    pub channel: usize,
    /// Multiplier applied to that channel
    pub factor: f32,
}

/// How decoded color images become model input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationRule {
    /// Divide 8-bit samples by 255, no per-channel standardization
    UnitScale,
}

/// What a scientific array must look like to be accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayShapePolicy {
    /// Any non-empty `(H, W, C)` array whose band count matches
    ChannelsOnly,
}

/// Immutable metadata describing one model generation
#[derive(Debug, Clone, PartialEq)]
pub struct VersionConfig {
    /// Version this entry describes
    pub version: ModelVersion,
    /// Expected input tensor shape for image inputs `(1, H, W, C)`
    pub input_shape: [usize; 4],
    /// Loss weights per raw class, kept as training metadata only
    pub class_weights: [f32; RAW_CLASS_COUNT],
    /// Correction applied to the raw prediction, if any
    pub correction: Option<ConfidenceCorrection>,
    /// Image normalization routine
    pub normalization: NormalizationRule,
    /// Scientific array validation routine
    pub array_policy: ArrayShapePolicy,
    /// Environment variable overriding the artifact location
    pub artifact_env: &'static str,
    /// Artifact file name used when no override is set
    pub default_artifact: &'static str,
}

impl VersionConfig {
    /// Expected band count of the input tensor
    pub const fn channels(&self) -> usize {
        self.input_shape[3]
    }
}

const LEGACY_CLASS_WEIGHTS: [f32; RAW_CLASS_COUNT] = [3.531, 0.430, 15.000, 1.708, 0.569];
const BALANCED_CLASS_WEIGHTS: [f32; RAW_CLASS_COUNT] = [0.0, 0.5, 3.0, 3.0, 1.0];

const THIN_CLOUD_PENALTY: ConfidenceCorrection = ConfidenceCorrection {
    channel: 3,
    factor: 0.65,
};

// Clip to [0.2, 10] and rescale so the weights average to one
fn clipped_mean_normalized(weights: [f32; RAW_CLASS_COUNT]) -> [f32; RAW_CLASS_COUNT] {
    let clipped = weights.map(|w| w.clamp(0.2, 10.0));
    let mean = clipped.iter().sum::<f32>() / RAW_CLASS_COUNT as f32;
    clipped.map(|w| w / mean)
}

/// Lookup table of version metadata, built once on first access
pub static VERSION_TABLE: LazyLock<[VersionConfig; 3]> = LazyLock::new(|| {
    let input_shape = [1, INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS];
    [
        VersionConfig {
            version: ModelVersion::V1,
            input_shape,
            class_weights: LEGACY_CLASS_WEIGHTS,
            correction: None,
            normalization: NormalizationRule::UnitScale,
            array_policy: ArrayShapePolicy::ChannelsOnly,
            artifact_env: MODEL_PATH_V1_ENV,
            default_artifact: DEFAULT_ARTIFACT_V1,
        },
        VersionConfig {
            version: ModelVersion::V2,
            input_shape,
            class_weights: clipped_mean_normalized(LEGACY_CLASS_WEIGHTS),
            correction: Some(THIN_CLOUD_PENALTY),
            normalization: NormalizationRule::UnitScale,
            array_policy: ArrayShapePolicy::ChannelsOnly,
            artifact_env: MODEL_PATH_V2_ENV,
            default_artifact: DEFAULT_ARTIFACT_V2,
        },
        VersionConfig {
            version: ModelVersion::V3,
            input_shape,
            class_weights: BALANCED_CLASS_WEIGHTS,
            correction: Some(THIN_CLOUD_PENALTY),
            normalization: NormalizationRule::UnitScale,
            array_policy: ArrayShapePolicy::ChannelsOnly,
            artifact_env: MODEL_PATH_V3_ENV,
            default_artifact: DEFAULT_ARTIFACT_V3,
        },
    ]
});
