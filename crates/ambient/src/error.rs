use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by the ambient crate.
pub type Result<T> = std::result::Result<T, AmbientError>;

/// Errors produced while loading, sampling or configuring the ambient effect.
///
/// None of these escape [`crate::DominantColorSampler`]; there they collapse
/// to [`crate::ColorSample::Transparent`].
#[derive(Debug)]
pub enum AmbientError {
    UnsupportedSource {
        source_id: String,
    },
    ImageIo {
        path: PathBuf,
        source: std::io::Error,
    },
    SurfaceUnavailable {
        width: u32,
        height: u32,
        reason: String,
    },
    BackgroundTask(String),
    InvalidProps {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
    PropsIo {
        path: PathBuf,
        source: std::io::Error,
    },
    PropsSerialization(serde_json::Error),
    Raster(raster::RasterError),
}

impl Display for AmbientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedSource { source_id } => {
                write!(f, "no loader for image source: {source_id}")
            }
            Self::ImageIo { path, source } => {
                write!(f, "failed to read image {} ({source})", path.display())
            }
            Self::SurfaceUnavailable {
                width,
                height,
                reason,
            } => write!(
                f,
                "2d surface {width}x{height} is unavailable: {reason}"
            ),
            Self::BackgroundTask(reason) => write!(f, "background task failed: {reason}"),
            Self::InvalidProps {
                field,
                value,
                expected,
            } => write!(f, "invalid {field}: {value} (expected {expected})"),
            Self::PropsIo { path, source } => {
                write!(f, "failed to read props {} ({source})", path.display())
            }
            Self::PropsSerialization(err) => write!(f, "props are not valid json: {err}"),
            Self::Raster(err) => write!(f, "raster error: {err}"),
        }
    }
}

impl std::error::Error for AmbientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageIo { source, .. } => Some(source),
            Self::PropsIo { source, .. } => Some(source),
            Self::PropsSerialization(err) => Some(err),
            Self::Raster(err) => Some(err),
            _ => None,
        }
    }
}

impl From<raster::RasterError> for AmbientError {
    fn from(value: raster::RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for AmbientError {
    fn from(value: serde_json::Error) -> Self {
        Self::PropsSerialization(value)
    }
}
