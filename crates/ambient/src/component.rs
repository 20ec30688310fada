use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::layout::{AmbientLayout, layout};
use crate::media::MediaPair;
use crate::props::{AmbientLightProps, MediaKind};
use crate::sync::DualMediaSync;

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Host callbacks fired by the content layer, with no payload.
#[derive(Clone, Default)]
pub struct MediaCallbacks {
    pub on_load: Option<Callback>,
    pub on_error: Option<Callback>,
}

impl MediaCallbacks {
    pub fn on_load(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_load = Some(Arc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

impl std::fmt::Debug for MediaCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCallbacks")
            .field("on_load", &self.on_load.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// One ambient-light component instance.
///
/// Owns its props, callbacks and glow sync; the media elements stay owned by
/// the host and are only bound here. Whenever the media kind or the bound
/// elements change, the sync is detached before anything is attached again.
#[derive(Debug)]
pub struct AmbientLight {
    props: AmbientLightProps,
    callbacks: MediaCallbacks,
    has_children: bool,
    media: Option<MediaPair>,
    sync: DualMediaSync,
    mounted: bool,
}

impl AmbientLight {
    /// Validates `props` and builds an unmounted component.
    pub fn new(props: AmbientLightProps, callbacks: MediaCallbacks) -> Result<Self> {
        props.validate()?;
        Ok(Self {
            props,
            callbacks,
            has_children: false,
            media: None,
            sync: DualMediaSync::new(),
            mounted: false,
        })
    }

    /// Marks whether the host renders children over the media.
    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    pub fn props(&self) -> &AmbientLightProps {
        &self.props
    }

    /// Resolved layers for the current props.
    pub fn layout(&self) -> AmbientLayout {
        layout(&self.props, self.has_children)
    }

    /// Mounts the component with the elements the host created, if any.
    pub fn mount(&mut self, media: Option<MediaPair>) {
        self.mounted = true;
        self.media = media;
        self.resync();
    }

    /// Replaces the props; re-attaches the sync only when the media kind changed.
    ///
    /// Invalid props are rejected and the previous props stay in effect.
    pub fn set_props(&mut self, props: AmbientLightProps) -> Result<()> {
        props.validate()?;
        let kind_changed = props.kind != self.props.kind;
        self.props = props;
        if kind_changed {
            debug!(kind = ?self.props.kind, "media kind changed");
            if self.props.kind != MediaKind::Video {
                self.media = None;
            }
            self.resync();
        }
        Ok(())
    }

    /// Binds new media elements, e.g. after the host re-created them.
    ///
    /// Binding the same elements again keeps the current attachment.
    pub fn bind_media(&mut self, media: Option<MediaPair>) {
        let unchanged = match (&self.media, &media) {
            (Some(current), Some(next)) => current.same_elements(next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        self.media = media;
        self.resync();
    }

    /// Tears down the sync; the component can be mounted again later.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.media = None;
        self.sync.detach();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// True while the glow mirrors the primary element.
    pub fn is_synced(&self) -> bool {
        self.sync.is_attached()
    }

    /// Content layer finished loading.
    pub fn notify_loaded(&self) {
        if let Some(callback) = &self.callbacks.on_load {
            callback();
        }
    }

    /// Content layer failed to load.
    pub fn notify_error(&self) {
        if let Some(callback) = &self.callbacks.on_error {
            callback();
        }
    }

    fn resync(&mut self) {
        if !self.mounted {
            self.sync.detach();
            return;
        }
        self.sync.reconcile(self.props.kind, self.media.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{AmbientLight, MediaCallbacks};
    use crate::props::{AmbientLightProps, MediaKind};

    #[test]
    fn new_rejects_invalid_props() {
        let mut props = AmbientLightProps::default();
        props.scale = -1.0;

        assert!(AmbientLight::new(props, MediaCallbacks::default()).is_err());
    }

    #[test]
    fn callbacks_fire_without_payload_and_absent_ones_are_ignored() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let component = AmbientLight::new(
            AmbientLightProps::new("a.jpg", MediaKind::Image),
            MediaCallbacks::default().on_load(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .expect("valid props");

        component.notify_loaded();
        component.notify_error();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_props_keeps_previous_props_when_invalid() {
        let mut component = AmbientLight::new(
            AmbientLightProps::new("a.jpg", MediaKind::Image),
            MediaCallbacks::default(),
        )
        .expect("valid props");
        let mut invalid = component.props().clone();
        invalid.opacity = 2.0;

        assert!(component.set_props(invalid).is_err());
        assert_eq!(component.props().opacity, 0.6);
    }
}
