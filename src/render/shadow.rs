//! Statistical shadow correction on the display-scaled RGB bands

use crate::inference::remap::{DisplayClass, DisplayMask};
use crate::io::configuration::RGB_CHANNELS;
use crate::io::error::Result;
use crate::preprocess::normalize::InputTensor;
use crate::render::encode::{rgb_png, scaled_rgb, to_base64, to_rgb_image};
use image::RgbImage;
use ndarray::{Array2, Array3, Axis};

/// Population mean and standard deviation
///
/// Returns `None` for an empty sample.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Move shadow pixel statistics onto those of the unshadowed pixels
///
/// Each band is handled independently on the display-scaled image. Shadow
/// values are z-score transferred to the valid-pixel mean and deviation; a
/// shadow region with zero deviation is only mean-shifted. Corrected values
/// are clipped to `[0, 255]`. Without shadow pixels the scaled image is
/// returned unchanged, and pixels outside the shadow class are never touched.
pub fn mitigate(tensor: &InputTensor, mask: &DisplayMask) -> RgbImage {
    to_rgb_image(&mitigate_pixels(tensor, mask))
}

/// [`mitigate`] on the raw `(H, W, 3)` byte array
pub fn mitigate_pixels(tensor: &InputTensor, mask: &DisplayMask) -> Array3<u8> {
    let image = scaled_rgb(tensor);
    let (rows, cols, _) = image.dim();

    let in_shadow = Array2::from_shape_fn((rows, cols), |(row, col)| {
        mask.get(row, col) == Some(DisplayClass::Shadow)
    });
    if !in_shadow.iter().any(|&s| s) {
        return image;
    }

    let mut mitigated = image.clone();
    for band in 0..RGB_CHANNELS {
        let source = image.index_axis(Axis(2), band);

        let mut valid = Vec::new();
        let mut shadow = Vec::new();
        for (&value, &is_shadow) in source.iter().zip(in_shadow.iter()) {
            if is_shadow {
                shadow.push(f64::from(value));
            } else {
                valid.push(f64::from(value));
            }
        }

        let (Some((mean_valid, std_valid)), Some((mean_shadow, std_shadow))) =
            (mean_std(&valid), mean_std(&shadow))
        else {
            continue;
        };

        let mut target = mitigated.index_axis_mut(Axis(2), band);
        for ((out, &value), &is_shadow) in target.iter_mut().zip(source.iter()).zip(in_shadow.iter())
        {
            if !is_shadow {
                continue;
            }
            let value = f64::from(value);
            let corrected = if std_shadow > 0.0 {
                (value - mean_shadow) / std_shadow * std_valid + mean_valid
            } else {
                value - mean_shadow + mean_valid
            };
            *out = corrected.clamp(0.0, 255.0) as u8;
        }
    }

    tracing::debug!(
        shadow_pixels = in_shadow.iter().filter(|&&s| s).count(),
        "shadow mitigation applied"
    );
    mitigated
}

/// Mitigated image encoded as base64 PNG
///
/// # Errors
///
/// Returns an `Encoding` error if PNG encoding fails
pub fn mitigate_base64(tensor: &InputTensor, mask: &DisplayMask) -> Result<String> {
    let png = rgb_png(&mitigate(tensor, mask), "mitigated image")?;
    Ok(to_base64(&png))
}
