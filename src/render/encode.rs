//! Shared RGB extraction, display scaling and PNG/base64 encoding

use crate::io::configuration::RGB_CHANNELS;
use crate::io::error::{CloudMaskError, Result, decode_failure};
use crate::preprocess::normalize::InputTensor;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use ndarray::{Array3, Axis, s};

/// Bands 0-2 of the tensor, min-max scaled jointly to `[0, 255]`
///
/// One global minimum and maximum is taken over all three bands. When they are
/// equal the raw values are used unscaled. Samples are truncated to bytes,
/// saturating outside `[0, 255]`.
pub fn scaled_rgb(tensor: &InputTensor) -> Array3<u8> {
    let Some(sample) = tensor.outer_iter().next() else {
        return Array3::zeros((0, 0, RGB_CHANNELS));
    };
    let bands = sample.len_of(Axis(2)).min(RGB_CHANNELS);
    let rgb = sample.slice(s![.., .., ..bands]);

    let (min, max) = rgb
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let mut scaled = Array3::zeros((rgb.dim().0, rgb.dim().1, RGB_CHANNELS));
    for ((row, col, band), &value) in rgb.indexed_iter() {
        let unit = if max > min {
            (value - min) / (max - min)
        } else {
            value
        };
        if let Some(slot) = scaled.get_mut((row, col, band)) {
            *slot = (unit * 255.0) as u8;
        }
    }
    scaled
}

/// Convert an `(H, W, 3)` byte array into an RGB image
pub fn to_rgb_image(pixels: &Array3<u8>) -> RgbImage {
    let (height, width, _) = pixels.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let sample = |band: usize| {
            pixels
                .get((y as usize, x as usize, band))
                .copied()
                .unwrap_or(0)
        };
        Rgb([sample(0), sample(1), sample(2)])
    })
}

/// Losslessly encode raw pixel bytes as PNG
///
/// # Errors
///
/// Returns an `Encoding` error if the encoder rejects the buffer
pub fn encode_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
    artifact: &'static str,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, color)
        .map_err(|e| CloudMaskError::Encoding {
            artifact,
            source: e,
        })?;
    Ok(buffer)
}

/// Encode an RGB image as PNG
///
/// # Errors
///
/// Returns an `Encoding` error if PNG encoding fails
pub fn rgb_png(image: &RgbImage, artifact: &'static str) -> Result<Vec<u8>> {
    encode_png(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
        artifact,
    )
}

/// Standard base64 with padding
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Wrap base64 PNG data in a `data:` URI
pub fn png_data_uri(base64_png: &str) -> String {
    format!("data:image/png;base64,{base64_png}")
}

/// Decode standard base64 back into bytes
///
/// # Errors
///
/// Returns `InvalidInput(DecodeFailure)` for malformed base64
pub fn from_base64(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| decode_failure("base64", &e))
}
