mod bitmap;
mod error;
mod glow;
mod surface;

pub use bitmap::{Bitmap, decode_bitmap, decode_bitmap_file};
pub use error::{RasterError, Result};
pub use glow::{GLOW_MAX_EDGE, glow_bitmap};
pub use surface::SoftwareSurface;
