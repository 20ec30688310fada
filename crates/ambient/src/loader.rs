use std::future::Future;
use std::path::{Path, PathBuf};

use raster::Bitmap;
use tracing::debug;

use crate::error::{AmbientError, Result};

const FILE_SCHEME: &str = "file://";

/// Credential mode of an image request.
///
/// The sampler always asks for `Anonymous` so that reading pixels back is
/// never blocked by a credentialed cross-origin response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CrossOrigin {
    #[default]
    Anonymous,
    UseCredentials,
}

/// Loads and decodes the bitmap behind a source identifier.
///
/// This is the sampler's only suspension point.
pub trait ImageLoader: Send + Sync + 'static {
    fn load(
        &self,
        source: &str,
        cross_origin: CrossOrigin,
    ) -> impl Future<Output = Result<Bitmap>> + Send;
}

/// Loader for local files, addressed by path or `file://` URL.
///
/// Reading happens on tokio's async fs, decoding on the blocking pool.
/// Remote schemes are rejected with [`AmbientError::UnsupportedSource`];
/// credentials do not apply to local files.
#[derive(Debug, Clone, Default)]
pub struct FsImageLoader {
    root: Option<PathBuf>,
}

impl FsImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative sources against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Maps a source identifier to a filesystem path.
    ///
    /// # Example
    /// ```
    /// use std::path::PathBuf;
    ///
    /// use ambient::FsImageLoader;
    ///
    /// let loader = FsImageLoader::with_root("/srv/media");
    /// assert_eq!(
    ///     loader.resolve("posters/a.jpg").expect("local"),
    ///     PathBuf::from("/srv/media/posters/a.jpg")
    /// );
    /// assert!(loader.resolve("https://example.com/a.jpg").is_err());
    /// ```
    pub fn resolve(&self, source: &str) -> Result<PathBuf> {
        let raw = if let Some(path) = source.strip_prefix(FILE_SCHEME) {
            path
        } else if source.contains("://") || source.starts_with("data:") {
            return Err(AmbientError::UnsupportedSource {
                source_id: source.to_owned(),
            });
        } else {
            source
        };

        let path = Path::new(raw);
        match &self.root {
            Some(root) if path.is_relative() => Ok(root.join(path)),
            _ => Ok(path.to_path_buf()),
        }
    }
}

impl ImageLoader for FsImageLoader {
    fn load(
        &self,
        source: &str,
        _cross_origin: CrossOrigin,
    ) -> impl Future<Output = Result<Bitmap>> + Send {
        let resolved = self.resolve(source);
        async move {
            let path = resolved?;
            debug!(path = %path.display(), "reading image");
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| AmbientError::ImageIo {
                    path: path.clone(),
                    source,
                })?;
            let bitmap = tokio::task::spawn_blocking(move || raster::decode_bitmap(&bytes))
                .await
                .map_err(|error| AmbientError::BackgroundTask(error.to_string()))??;
            Ok(bitmap)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::FsImageLoader;
    use crate::AmbientError;

    #[test]
    fn resolve_strips_file_scheme() {
        let loader = FsImageLoader::new();

        assert_eq!(
            loader.resolve("file:///tmp/a.png").expect("file url"),
            PathBuf::from("/tmp/a.png")
        );
    }

    #[test]
    fn resolve_keeps_absolute_paths_outside_root() {
        let loader = FsImageLoader::with_root("/srv");

        assert_eq!(
            loader.resolve("/tmp/a.png").expect("absolute"),
            PathBuf::from("/tmp/a.png")
        );
    }

    #[test]
    fn resolve_rejects_remote_and_inline_sources() {
        let loader = FsImageLoader::new();

        for source in ["http://host/a.png", "https://host/a.png", "data:image/png;base64,AA"] {
            assert!(matches!(
                loader.resolve(source),
                Err(AmbientError::UnsupportedSource { .. })
            ));
        }
    }
}
