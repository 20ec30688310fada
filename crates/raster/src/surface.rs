use image::Rgba;

use crate::bitmap::Bitmap;
use crate::error::{RasterError, Result};

/// CPU-backed 2D drawing surface.
///
/// Starts fully transparent. `draw_image` scales a whole bitmap into a
/// destination rectangle with an area-averaging box filter and composites it
/// source-over; `read_pixels` returns straight-alpha RGBA bytes.
///
/// # Example
/// ```
/// use raster::SoftwareSurface;
///
/// let bitmap = image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 255]));
/// let mut surface = SoftwareSurface::new(1, 1).expect("surface");
/// surface.draw_image(&bitmap, 0, 0, 1, 1).expect("draw");
///
/// assert_eq!(surface.read_pixels(0, 0, 1, 1).expect("read"), vec![200, 100, 50, 255]);
/// ```
#[derive(Debug, Clone)]
pub struct SoftwareSurface {
    pixels: Bitmap,
}

impl SoftwareSurface {
    /// Creates a transparent surface. Both dimensions must be positive.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidSurfaceSize { width, height });
        }
        Ok(Self {
            pixels: Bitmap::new(width, height),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Draws all of `source` scaled into the `dw`x`dh` rectangle at (`dx`, `dy`).
    ///
    /// Each destination pixel receives the alpha-weighted mean of the source
    /// pixels it covers, so drawing into a single pixel yields the mean color of
    /// the whole bitmap. Destination pixels outside the surface are clipped. A
    /// zero-sized destination draws nothing.
    pub fn draw_image(
        &mut self,
        source: &Bitmap,
        dx: i64,
        dy: i64,
        dw: u32,
        dh: u32,
    ) -> Result<()> {
        let (sw, sh) = source.dimensions();
        if sw == 0 || sh == 0 {
            return Err(RasterError::EmptySource);
        }
        if dw == 0 || dh == 0 {
            return Ok(());
        }

        for j in 0..dh {
            let Some(ty) = self.surface_coord(dy + i64::from(j), self.height()) else {
                continue;
            };
            let (sy0, sy1) = source_span(j, dh, sh);
            for i in 0..dw {
                let Some(tx) = self.surface_coord(dx + i64::from(i), self.width()) else {
                    continue;
                };
                let (sx0, sx1) = source_span(i, dw, sw);
                let sample = average_block(source, sx0..sx1, sy0..sy1);
                composite_over(self.pixels.get_pixel_mut(tx, ty), sample);
            }
        }
        Ok(())
    }

    /// Reads a `width`x`height` region as RGBA bytes, row-major.
    ///
    /// Pixels outside the surface read as transparent black.
    pub fn read_pixels(&self, x: i64, y: i64, width: u32, height: u32) -> Result<Vec<u8>> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyRegion { width, height });
        }

        let mut out = Vec::with_capacity(width as usize * height as usize * 4);
        for j in 0..height {
            for i in 0..width {
                let px = self
                    .surface_coord(x + i64::from(i), self.width())
                    .zip(self.surface_coord(y + i64::from(j), self.height()))
                    .map(|(sx, sy)| self.pixels.get_pixel(sx, sy).0)
                    .unwrap_or([0; 4]);
                out.extend_from_slice(&px);
            }
        }
        Ok(out)
    }

    fn surface_coord(&self, value: i64, limit: u32) -> Option<u32> {
        if value < 0 || value >= i64::from(limit) {
            return None;
        }
        u32::try_from(value).ok()
    }
}

/// Source pixel span `[start, end)` covered by destination index `index`.
fn source_span(index: u32, dest_len: u32, source_len: u32) -> (u32, u32) {
    let index = u64::from(index);
    let dest_len = u64::from(dest_len);
    let source_len = u64::from(source_len);

    let start = (index * source_len / dest_len).min(source_len - 1);
    let end = ((index + 1) * source_len)
        .div_ceil(dest_len)
        .clamp(start + 1, source_len);
    (start as u32, end as u32)
}

fn average_block(
    source: &Bitmap,
    xs: std::ops::Range<u32>,
    ys: std::ops::Range<u32>,
) -> [u8; 4] {
    let mut count = 0u64;
    let mut alpha_sum = 0u64;
    let mut weighted = [0u64; 3];

    for y in ys {
        for x in xs.clone() {
            let [r, g, b, a] = source.get_pixel(x, y).0;
            let a = u64::from(a);
            count += 1;
            alpha_sum += a;
            weighted[0] += u64::from(r) * a;
            weighted[1] += u64::from(g) * a;
            weighted[2] += u64::from(b) * a;
        }
    }

    if count == 0 || alpha_sum == 0 {
        return [0; 4];
    }

    [
        div_round(weighted[0], alpha_sum),
        div_round(weighted[1], alpha_sum),
        div_round(weighted[2], alpha_sum),
        div_round(alpha_sum, count),
    ]
}

fn div_round(num: u64, den: u64) -> u8 {
    ((num + den / 2) / den).min(255) as u8
}

fn composite_over(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let src_a = src[3];
    if src_a == 0 {
        return;
    }
    if src_a == 255 || dst.0[3] == 0 {
        dst.0 = src;
        return;
    }

    let sa = f32::from(src_a) / 255.0;
    let da = f32::from(dst.0[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for channel in 0..3 {
        let sc = f32::from(src[channel]);
        let dc = f32::from(dst.0[channel]);
        let blended = (sc * sa + dc * da * (1.0 - sa)) / out_a;
        dst.0[channel] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
