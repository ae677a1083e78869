//! Grayscale PNG encoding of the display mask

use crate::inference::remap::DisplayMask;
use crate::io::configuration::MASK_INTENSITIES;
use crate::io::error::Result;
use crate::render::encode::{encode_png, to_base64};
use image::{ExtendedColorType, GrayImage, Luma};

/// Mask as an 8-bit grayscale image with one fixed intensity per class
pub fn mask_image(mask: &DisplayMask) -> GrayImage {
    let (rows, cols) = mask.dim();
    GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        let intensity = mask
            .get(y as usize, x as usize)
            .and_then(|class| MASK_INTENSITIES.get(class.index()).copied())
            .unwrap_or(0);
        Luma([intensity])
    })
}

/// Encode the mask as a base64 grayscale PNG
///
/// # Errors
///
/// Returns an `Encoding` error if PNG encoding fails
pub fn encode(mask: &DisplayMask) -> Result<String> {
    let image = mask_image(mask);
    let png = encode_png(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::L8,
        "mask",
    )?;
    Ok(to_base64(&png))
}
