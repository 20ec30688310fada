use raster::{Bitmap, SoftwareSurface};

use crate::color::ColorSample;
use crate::error::{AmbientError, Result};

/// A 2D drawing surface able to scale a bitmap in and read pixels back.
pub trait RasterSurface {
    /// Draws all of `bitmap` scaled into the `dw`x`dh` rectangle at (`dx`, `dy`).
    fn draw_image(&mut self, bitmap: &Bitmap, dx: i64, dy: i64, dw: u32, dh: u32) -> Result<()>;

    /// Reads RGBA bytes of a region, row-major.
    fn read_pixels(&self, x: i64, y: i64, width: u32, height: u32) -> Result<Vec<u8>>;
}

/// Creates surfaces. Acquisition may fail when the environment has no 2D support.
pub trait SurfaceFactory: Send + Sync + 'static {
    type Surface: RasterSurface;

    fn create(&self, width: u32, height: u32) -> Result<Self::Surface>;
}

impl RasterSurface for SoftwareSurface {
    fn draw_image(&mut self, bitmap: &Bitmap, dx: i64, dy: i64, dw: u32, dh: u32) -> Result<()> {
        SoftwareSurface::draw_image(self, bitmap, dx, dy, dw, dh)?;
        Ok(())
    }

    fn read_pixels(&self, x: i64, y: i64, width: u32, height: u32) -> Result<Vec<u8>> {
        Ok(SoftwareSurface::read_pixels(self, x, y, width, height)?)
    }
}

/// Factory for CPU-backed [`SoftwareSurface`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwareSurfaceFactory;

impl SurfaceFactory for SoftwareSurfaceFactory {
    type Surface = SoftwareSurface;

    fn create(&self, width: u32, height: u32) -> Result<Self::Surface> {
        SoftwareSurface::new(width, height).map_err(|error| AmbientError::SurfaceUnavailable {
            width,
            height,
            reason: error.to_string(),
        })
    }
}

/// Reduces `bitmap` to one color by drawing it into a fresh 1x1 surface.
///
/// This is a box-filtered mean of every pixel, not a perceptual dominant
/// color: a half-red, half-blue image yields purple.
///
/// # Example
/// ```
/// use ambient::{ColorSample, SoftwareSurfaceFactory, sample_bitmap};
///
/// let bitmap = image::RgbaImage::from_pixel(8, 8, image::Rgba([200, 100, 50, 255]));
/// let color = sample_bitmap(&SoftwareSurfaceFactory, &bitmap).expect("sample");
/// assert_eq!(color, ColorSample::rgb(200, 100, 50));
/// ```
pub fn sample_bitmap<F>(surfaces: &F, bitmap: &Bitmap) -> Result<ColorSample>
where
    F: SurfaceFactory + ?Sized,
{
    let mut surface = surfaces.create(1, 1)?;
    surface.draw_image(bitmap, 0, 0, 1, 1)?;
    let pixel = surface.read_pixels(0, 0, 1, 1)?;
    ColorSample::from_rgba(&pixel).ok_or_else(|| AmbientError::SurfaceUnavailable {
        width: 1,
        height: 1,
        reason: format!("readback returned {} bytes", pixel.len()),
    })
}

#[cfg(test)]
mod tests {
    use image::Rgba;
    use raster::Bitmap;

    use super::{SoftwareSurfaceFactory, SurfaceFactory, sample_bitmap};
    use crate::{AmbientError, ColorSample};

    #[test]
    fn uniform_bitmap_samples_to_its_own_color() {
        let bitmap = Bitmap::from_pixel(640, 480, Rgba([200, 100, 50, 255]));

        let color = sample_bitmap(&SoftwareSurfaceFactory, &bitmap).expect("sample");

        assert_eq!(color, ColorSample::rgb(200, 100, 50));
    }

    #[test]
    fn two_tone_bitmap_samples_to_the_mean_not_the_majority() {
        let mut bitmap = Bitmap::from_pixel(4, 1, Rgba([255, 0, 0, 255]));
        bitmap.put_pixel(3, 0, Rgba([0, 0, 255, 255]));

        let color = sample_bitmap(&SoftwareSurfaceFactory, &bitmap).expect("sample");

        assert_eq!(color, ColorSample::rgb(191, 0, 64));
    }

    #[test]
    fn software_factory_reports_zero_sized_surfaces_as_unavailable() {
        let result = SoftwareSurfaceFactory.create(0, 0);

        assert!(matches!(
            result,
            Err(AmbientError::SurfaceUnavailable {
                width: 0,
                height: 0,
                ..
            })
        ));
    }
}
