//! Pipeline constants and runtime configuration defaults

use std::time::Duration;

// Tensor geometry shared by every model generation
/// Spatial edge length of the model input
pub const INPUT_SIZE: usize = 256;
/// Number of bands in the model input
pub const INPUT_CHANNELS: usize = 8;
/// Number of bands taken from a decoded color image
pub const RGB_CHANNELS: usize = 3;
/// Number of raw classes in the model output
pub const RAW_CLASS_COUNT: usize = 5;
/// Number of user-facing display classes
pub const DISPLAY_CLASS_COUNT: usize = 4;

/// Shadow coverage (percent) above which an image is reported as shadowed
pub const SHADOW_PRESENCE_THRESHOLD: f64 = 1.0;

// Grayscale intensities of the encoded mask, indexed by display class
/// Mask intensities for clear, shadow, thin cloud, thick cloud
pub const MASK_INTENSITIES: [u8; DISPLAY_CLASS_COUNT] = [0, 85, 170, 255];

// Solar potential intensities, indexed by display class
/// Heatmap intensities for clear, shadow, thin cloud, thick cloud
pub const HEATMAP_INTENSITIES: [u8; DISPLAY_CLASS_COUNT] = [255, 25, 127, 25];

/// Default upper bound on a single model prediction
pub const DEFAULT_PREDICTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Model type used when a request does not name one
pub const DEFAULT_MODEL_TYPE: &str = "v2";

// Artifact resolution
/// Environment override for the V1 artifact location
pub const MODEL_PATH_V1_ENV: &str = "MODEL_PATH_V1";
/// Environment override for the V2 artifact location
pub const MODEL_PATH_V2_ENV: &str = "MODEL_PATH_V2";
/// Environment override for the V3 artifact location
pub const MODEL_PATH_V3_ENV: &str = "MODEL_PATH_V3";
/// Default V1 artifact file name
pub const DEFAULT_ARTIFACT_V1: &str = "model.onnx";
/// Default V2 artifact file name
pub const DEFAULT_ARTIFACT_V2: &str = "Attention_UNet_Advanced_1.onnx";
/// Default V3 artifact file name
pub const DEFAULT_ARTIFACT_V3: &str = "Attention_UNet_Balanced_Final.onnx";

// Declared media types
/// Media type announcing a serialized numeric array
pub const NPY_MEDIA_TYPE: &str = "application/x-npy";
/// File extension announcing a serialized numeric array
pub const NPY_EXTENSION: &str = "npy";
/// Media types that carry no format information
pub const GENERIC_MEDIA_TYPES: [&str; 2] = ["application/octet-stream", "binary/octet-stream"];

// Output settings
/// Suffix for the encoded grayscale mask
pub const MASK_SUFFIX: &str = "_mask.png";
/// Suffix for the JSON inference response
pub const RESULT_SUFFIX: &str = "_result.json";
/// Suffix for the shadow-corrected image
pub const MITIGATED_SUFFIX: &str = "_mitigated.png";
/// Suffix for the solar potential heatmap
pub const HEATMAP_SUFFIX: &str = "_heatmap.png";
/// Input file extensions picked up when a directory is processed
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "tif", "tiff", "npy"];

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

/// Log filter applied when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "cloudmask=info";
/// Log filter applied in quiet mode
pub const QUIET_LOG_FILTER: &str = "cloudmask=warn";
