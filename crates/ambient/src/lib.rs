//! UI-agnostic core of the ambient glow effect.
//!
//! Two independent pieces live here: [`DualMediaSync`], which mirrors the
//! transport of a foreground video onto its blurred glow copy, and
//! [`DominantColorSampler`], which derives one accent color from a bitmap
//! off the render path. [`AmbientLight`] hosts both the way a UI component
//! would.

pub mod color;
pub mod component;
pub mod error;
pub mod layout;
pub mod loader;
pub mod media;
pub mod props;
pub mod sampler;
pub mod surface;
pub mod sync;
pub mod transport;

pub use color::ColorSample;
pub use component::{AmbientLight, MediaCallbacks};
pub use error::{AmbientError, Result};
pub use layout::{AmbientLayout, ElementKind, Layer, LayerRole, LayerStyle, MediaAttributes, layout};
pub use loader::{CrossOrigin, FsImageLoader, ImageLoader};
pub use media::{Listener, ListenerId, MediaError, MediaEvent, MediaHandle, MediaPair};
pub use props::{AmbientLightProps, MediaKind};
pub use sampler::{DominantColorSampler, RequestId, SampleRequest, SamplerSnapshot, SamplerState};
pub use surface::{RasterSurface, SoftwareSurfaceFactory, SurfaceFactory, sample_bitmap};
pub use sync::DualMediaSync;
pub use transport::HeadlessTransport;
