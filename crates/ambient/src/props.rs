use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AmbientError, Result};

pub const DEFAULT_BLUR_PX: f64 = 40.0;
pub const DEFAULT_SCALE: f64 = 1.1;
pub const DEFAULT_OPACITY: f64 = 0.6;
pub const DEFAULT_ALT: &str = "Content";

/// Kind of media rendered by the component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

/// Declarative parameters of one ambient-light component.
///
/// Keys use the camelCase names hosts already pass (`videoAutoPlay`,
/// `className`, ...); every key is optional.
///
/// # Example
/// ```
/// use ambient::{AmbientLightProps, MediaKind};
///
/// let props = AmbientLightProps::from_json_str(r#"{"src":"clip.mp4","type":"video"}"#)
///     .expect("valid props");
///
/// assert_eq!(props.kind, MediaKind::Video);
/// assert_eq!(props.blur, 40.0);
/// assert!(props.muted());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AmbientLightProps {
    pub src: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Glow blur radius in pixels, `>= 0`.
    pub blur: f64,
    /// Glow scale factor, `> 0`.
    pub scale: f64,
    /// Glow opacity in `[0, 1]`.
    pub opacity: f64,
    pub class_name: String,
    pub video_auto_play: bool,
    pub video_controls: bool,
    pub video_loop: bool,
    /// Explicit mute; `None` follows `video_auto_play`.
    pub video_muted: Option<bool>,
    pub alt: String,
}

impl Default for AmbientLightProps {
    fn default() -> Self {
        Self {
            src: String::new(),
            kind: MediaKind::Image,
            blur: DEFAULT_BLUR_PX,
            scale: DEFAULT_SCALE,
            opacity: DEFAULT_OPACITY,
            class_name: String::new(),
            video_auto_play: true,
            video_controls: false,
            video_loop: true,
            video_muted: None,
            alt: DEFAULT_ALT.to_owned(),
        }
    }
}

impl AmbientLightProps {
    /// Default props for `src`.
    pub fn new(src: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            src: src.into(),
            kind,
            ..Self::default()
        }
    }

    /// Parses and validates props from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let props: Self = serde_json::from_str(json)?;
        props.validate()?;
        Ok(props)
    }

    /// Reads, parses and validates a props JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AmbientError::PropsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Effective mute flag of the content video.
    ///
    /// Autoplaying video must start muted unless the host says otherwise.
    pub fn muted(&self) -> bool {
        self.video_muted.unwrap_or(self.video_auto_play)
    }

    /// Checks the visual parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.blur.is_finite() || self.blur < 0.0 {
            return Err(AmbientError::InvalidProps {
                field: "blur",
                value: self.blur,
                expected: ">= 0",
            });
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(AmbientError::InvalidProps {
                field: "scale",
                value: self.scale,
                expected: "> 0",
            });
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(AmbientError::InvalidProps {
                field: "opacity",
                value: self.opacity,
                expected: "within [0, 1]",
            });
        }
        Ok(())
    }
}
