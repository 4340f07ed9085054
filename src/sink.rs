// Image sink
// Masks leave the crate as 8-bit grayscale PNGs: set pixels 255, clear 0.

use std::path::Path;

use image::GrayImage;

use crate::error::{AsvrError, Result};
use crate::rasterizer::Mask;

pub fn to_gray_image(mask: &Mask) -> Result<GrayImage> {
    GrayImage::from_raw(mask.width(), mask.height(), mask.to_gray8())
        .ok_or_else(|| AsvrError::format(format!("Mask {}x{} does not fit a grayscale image", mask.width(), mask.height())))
}

/// Write `mask` to `path` as a grayscale PNG.
pub fn save_png(mask: &Mask, path: impl AsRef<Path>) -> Result<()> {
    to_gray_image(mask)?.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
    Ok(())
}

/// `frame_000042.png`
pub fn frame_file_name(index: u32) -> String {
    format!("frame_{index:06}.png")
}
