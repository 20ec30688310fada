use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, RasterError>;

/// Error type for bitmap decoding and software rasterization.
#[derive(Debug)]
pub enum RasterError {
    InvalidSurfaceSize {
        width: u32,
        height: u32,
    },
    EmptyRegion {
        width: u32,
        height: u32,
    },
    EmptySource,
    Io {
        context: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    Decode(image::ImageError),
}

impl Display for RasterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSurfaceSize { width, height } => {
                write!(f, "invalid surface size {width}x{height}")
            }
            Self::EmptyRegion { width, height } => {
                write!(f, "pixel region is empty: {width}x{height}")
            }
            Self::EmptySource => write!(f, "source bitmap has no pixels"),
            Self::Io {
                context,
                path,
                source,
            } => write!(f, "{context}: {} ({source})", path.display()),
            Self::Decode(err) => write!(f, "bitmap decode failed: {err}"),
        }
    }
}

impl std::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for RasterError {
    fn from(value: image::ImageError) -> Self {
        Self::Decode(value)
    }
}
