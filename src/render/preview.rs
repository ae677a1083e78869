//! Displayable RGB preview of the model input

use crate::io::error::Result;
use crate::preprocess::normalize::InputTensor;
use crate::render::encode::{png_data_uri, rgb_png, scaled_rgb, to_base64, to_rgb_image};
use image::RgbImage;

/// Bands 0-2 of the input, min-max scaled for display
///
/// Works the same for unit-scaled image tensors and for unscaled scientific
/// arrays.
pub fn preview(tensor: &InputTensor) -> RgbImage {
    to_rgb_image(&scaled_rgb(tensor))
}

/// Preview encoded as a `data:image/png;base64,...` URI
///
/// # Errors
///
/// Returns an `Encoding` error if PNG encoding fails
pub fn preview_data_uri(tensor: &InputTensor) -> Result<String> {
    let png = rgb_png(&preview(tensor), "preview")?;
    Ok(png_data_uri(&to_base64(&png)))
}
