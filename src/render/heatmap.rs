//! Solar potential heatmap in a blue-to-red false-color palette

use crate::inference::remap::DisplayMask;
use crate::io::configuration::HEATMAP_INTENSITIES;
use crate::io::error::Result;
use crate::render::encode::{rgb_png, to_base64};
use image::{Rgb, RgbImage};

/// Piecewise-linear "jet" ramp: dark blue at 0 through green to dark red at 255
pub fn jet(intensity: u8) -> [u8; 3] {
    let x = f64::from(intensity) / 255.0;
    let ramp = |center: f64| {
        let level = (1.5 - 4.0f64.mul_add(x, -center).abs()).clamp(0.0, 1.0);
        (level * 255.0).round() as u8
    };
    [ramp(3.0), ramp(2.0), ramp(1.0)]
}

/// Solar potential per pixel: high for clear, medium for thin cloud, low otherwise
pub fn potential(mask: &DisplayMask) -> ndarray::Array2<u8> {
    mask.classes().mapv(|class| {
        HEATMAP_INTENSITIES
            .get(class.index())
            .copied()
            .unwrap_or(0)
    })
}

/// False-color rendering of the mask's solar potential
pub fn heatmap(mask: &DisplayMask) -> RgbImage {
    let levels = potential(mask);
    let (rows, cols) = levels.dim();
    RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        let level = levels.get((y as usize, x as usize)).copied().unwrap_or(0);
        Rgb(jet(level))
    })
}

/// Heatmap encoded as base64 PNG
///
/// # Errors
///
/// Returns an `Encoding` error if PNG encoding fails
pub fn heatmap_base64(mask: &DisplayMask) -> Result<String> {
    let png = rgb_png(&heatmap(mask), "heatmap")?;
    Ok(to_base64(&png))
}
