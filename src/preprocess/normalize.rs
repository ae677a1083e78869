//! Conversion of raw payloads into canonical model input tensors

use crate::io::configuration::RGB_CHANNELS;
use crate::io::error::{InvalidInputKind, Result, decode_failure, invalid_input};
use crate::model::version::{ArrayShapePolicy, ModelVersion, NormalizationRule, VersionConfig};
use crate::preprocess::input::{InputKind, RawInput};
use image::imageops::{self, FilterType};
use ndarray::{Array4, ArrayD, Axis, Ix3};
use ndarray_npy::ReadNpyExt;

/// Model input `(1, H, W, 8)`; `H = W = 256` for image-derived tensors
pub type InputTensor = Array4<f32>;

/// Resampling filter used when fitting images to the model input size
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Turns one modality's payload bytes into an input tensor
pub trait InputHandler {
    /// Decode and normalize `bytes` for the given model version
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the payload cannot be decoded or has the wrong shape
    fn normalize(&self, config: &VersionConfig, bytes: &[u8]) -> Result<InputTensor>;
}

/// Decodes color images, resizes them and scales samples into `[0, 1]`
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageHandler;

impl InputHandler for ImageHandler {
    fn normalize(&self, config: &VersionConfig, bytes: &[u8]) -> Result<InputTensor> {
        let decoded = image::load_from_memory(bytes).map_err(|e| decode_failure("image", &e))?;
        tracing::debug!(
            version = %config.version,
            width = decoded.width(),
            height = decoded.height(),
            "decoded image input"
        );

        let [_, height, width, channels] = config.input_shape;
        let rgb = decoded.to_rgb8();
        let resized = imageops::resize(&rgb, width as u32, height as u32, RESIZE_FILTER);

        // Bands past RGB stay zero
        let mut tensor = Array4::<f32>::zeros((1, height, width, channels));
        match config.normalization {
            NormalizationRule::UnitScale => {
                for (x, y, pixel) in resized.enumerate_pixels() {
                    for (c, &value) in pixel.0.iter().enumerate().take(RGB_CHANNELS) {
                        if let Some(slot) = tensor.get_mut((0, y as usize, x as usize, c)) {
                            *slot = (f64::from(value) / 255.0) as f32;
                        }
                    }
                }
            }
        }

        Ok(tensor)
    }
}

/// Loads `.npy` arrays and passes their values through unscaled
#[derive(Debug, Default, Clone, Copy)]
pub struct ScientificArrayHandler;

impl ScientificArrayHandler {
    // Accept float32 or float64 payloads; everything is cast to float32
    fn read_array(bytes: &[u8]) -> Result<ArrayD<f32>> {
        match ArrayD::<f32>::read_npy(bytes) {
            Ok(array) => Ok(array),
            Err(f32_error) => ArrayD::<f64>::read_npy(bytes)
                .map(|array| array.mapv(|v| v as f32))
                .map_err(|_f64_error| decode_failure("npy", &f32_error)),
        }
    }

    fn validate(config: &VersionConfig, shape: &[usize]) -> Result<()> {
        match config.array_policy {
            ArrayShapePolicy::ChannelsOnly => {
                let found = shape.last().copied().unwrap_or(0);
                if found != config.channels() {
                    return Err(invalid_input(InvalidInputKind::InvalidChannelCount {
                        expected: config.channels(),
                        found,
                    }));
                }

                let is_image_like =
                    matches!(shape, [height, width, _] if *height > 0 && *width > 0);
                if !is_image_like {
                    return Err(invalid_input(InvalidInputKind::InvalidShape {
                        shape: shape.to_vec(),
                    }));
                }
                Ok(())
            }
        }
    }
}

impl InputHandler for ScientificArrayHandler {
    fn normalize(&self, config: &VersionConfig, bytes: &[u8]) -> Result<InputTensor> {
        let array = Self::read_array(bytes)?;
        Self::validate(config, array.shape())?;
        tracing::debug!(version = %config.version, shape = ?array.shape(), "loaded array input");

        let array = array
            .into_dimensionality::<Ix3>()
            .map_err(|e| decode_failure("npy", &e))?;
        Ok(array.insert_axis(Axis(0)).as_standard_layout().into_owned())
    }
}

/// Dispatches payloads to the handler for their declared modality
#[derive(Debug, Default, Clone, Copy)]
pub struct InputNormalizer {
    image: ImageHandler,
    array: ScientificArrayHandler,
}

impl InputNormalizer {
    /// Create a normalizer with the standard handlers
    pub const fn new() -> Self {
        Self {
            image: ImageHandler,
            array: ScientificArrayHandler,
        }
    }

    /// Handler responsible for `kind`
    pub fn handler(&self, kind: InputKind) -> &dyn InputHandler {
        match kind {
            InputKind::Image => &self.image,
            InputKind::ScientificArray => &self.array,
        }
    }

    /// Convert `input` into the tensor expected by `version`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if:
    /// - The payload is empty
    /// - The image or array cannot be decoded
    /// - An array is not `(H, W, 8)`
    pub fn normalize(&self, version: ModelVersion, input: &RawInput) -> Result<InputTensor> {
        if input.is_empty() {
            return Err(invalid_input(InvalidInputKind::MissingFile));
        }
        self.handler(input.kind())
            .normalize(version.config(), input.bytes())
    }
}

