use image::imageops::{self, FilterType};
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::error::{RasterError, Result};

/// Longest edge of the intermediate bitmap used for the glow layer.
pub const GLOW_MAX_EDGE: u32 = 256;

/// Builds the blurred glow layer for hosts that cannot blur at draw time.
///
/// The bitmap is first shrunk so its longest edge is at most
/// [`GLOW_MAX_EDGE`], then gaussian-blurred. `blur_px` is the radius the
/// layer would get at full size; it is scaled down with the bitmap so the
/// result looks the same once stretched back. A radius of zero only shrinks.
pub fn glow_bitmap(source: &Bitmap, blur_px: f64) -> Result<Bitmap> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(RasterError::EmptySource);
    }

    let longest = width.max(height);
    let ratio = if longest > GLOW_MAX_EDGE {
        f64::from(GLOW_MAX_EDGE) / f64::from(longest)
    } else {
        1.0
    };
    let target_w = ((f64::from(width) * ratio).round() as u32).max(1);
    let target_h = ((f64::from(height) * ratio).round() as u32).max(1);

    let shrunk = if ratio < 1.0 {
        imageops::resize(source, target_w, target_h, FilterType::Triangle)
    } else {
        source.clone()
    };

    // CSS blur radius is the gaussian standard deviation.
    let sigma = (blur_px.max(0.0) * ratio) as f32;
    debug!(width, height, target_w, target_h, sigma, "building glow bitmap");
    if sigma <= f32::EPSILON {
        return Ok(shrunk);
    }
    Ok(imageops::blur(&shrunk, sigma))
}
