use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// One representative color, or the transparent sentinel.
///
/// Values are immutable; the sampler replaces its current sample wholesale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColorSample {
    /// No computed color.
    #[default]
    Transparent,
    Rgb { r: u8, g: u8, b: u8 },
}

impl ColorSample {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb { r, g, b }
    }

    /// Builds a sample from RGBA bytes, dropping alpha.
    ///
    /// Returns `None` when fewer than three channels are present.
    pub fn from_rgba(pixel: &[u8]) -> Option<Self> {
        match pixel {
            [r, g, b, ..] => Some(Self::rgb(*r, *g, *b)),
            _ => None,
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }

    /// Channels as an array, `None` for the sentinel.
    pub fn channels(&self) -> Option<[u8; 3]> {
        match *self {
            Self::Transparent => None,
            Self::Rgb { r, g, b } => Some([r, g, b]),
        }
    }

    /// CSS color text: `rgb(r,g,b)` or `rgba(0,0,0,0)`.
    ///
    /// # Example
    /// ```
    /// use ambient::ColorSample;
    ///
    /// assert_eq!(ColorSample::rgb(255, 128, 64).to_css(), "rgb(255,128,64)");
    /// assert_eq!(ColorSample::Transparent.to_css(), "rgba(0,0,0,0)");
    /// ```
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl Display for ColorSample {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transparent => write!(f, "rgba(0,0,0,0)"),
            Self::Rgb { r, g, b } => write!(f, "rgb({r},{g},{b})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ColorSample;

    #[test]
    fn from_rgba_discards_alpha() {
        assert_eq!(
            ColorSample::from_rgba(&[1, 2, 3, 0]),
            Some(ColorSample::rgb(1, 2, 3))
        );
        assert_eq!(ColorSample::from_rgba(&[1, 2]), None);
    }

    #[test]
    fn default_is_the_transparent_sentinel() {
        assert!(ColorSample::default().is_transparent());
        assert_eq!(ColorSample::default().channels(), None);
    }
}
