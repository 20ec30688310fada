use std::path::Path;

use crate::error::{RasterError, Result};

/// Decoded straight-alpha RGBA8 bitmap.
pub type Bitmap = image::RgbaImage;

/// Decodes an encoded image (PNG, JPEG, ...) into an RGBA bitmap.
///
/// The container format is guessed from the leading bytes.
///
/// # Example
/// ```
/// use std::io::Cursor;
///
/// let mut encoded = Vec::new();
/// image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 255]))
///     .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
///     .expect("encode");
///
/// let bitmap = raster::decode_bitmap(&encoded).expect("decode");
/// assert_eq!(bitmap.dimensions(), (2, 2));
/// ```
pub fn decode_bitmap(bytes: &[u8]) -> Result<Bitmap> {
    let decoded = image::load_from_memory(bytes)?;
    let bitmap = decoded.into_rgba8();
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Err(RasterError::EmptySource);
    }
    Ok(bitmap)
}

/// Reads and decodes one image file.
pub fn decode_bitmap_file(path: impl AsRef<Path>) -> Result<Bitmap> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| RasterError::Io {
        context: "read bitmap file",
        path: path.to_path_buf(),
        source,
    })?;
    decode_bitmap(&bytes)
}

#[cfg(test)]
mod tests {
    use super::decode_bitmap;
    use crate::RasterError;

    #[test]
    fn decode_rejects_bytes_that_are_not_an_image() {
        let result = decode_bitmap(b"definitely not a png");

        assert!(matches!(result, Err(RasterError::Decode(_))));
    }
}
