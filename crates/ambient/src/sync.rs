use std::sync::{Arc, Weak};

use tracing::debug;

use crate::media::{ListenerId, MediaEvent, MediaHandle, MediaPair};
use crate::props::MediaKind;

/// Mirrors the primary element's transport onto the glow element.
///
/// The relation is one-way: listeners are only ever registered on the
/// primary, and they only ever command the glow. Listeners hold weak
/// references, so an attachment never keeps either element alive.
#[derive(Debug, Default)]
pub struct DualMediaSync {
    attachment: Option<Attachment>,
}

impl DualMediaSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the play, pause and seeking mirrors on `primary`.
    ///
    /// Any previous attachment is fully detached first.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    ///
    /// use ambient::{DualMediaSync, HeadlessTransport, MediaHandle};
    ///
    /// let primary = Arc::new(HeadlessTransport::new());
    /// let glow = Arc::new(HeadlessTransport::new());
    /// let primary_handle: Arc<dyn MediaHandle> = primary.clone();
    /// let glow_handle: Arc<dyn MediaHandle> = glow.clone();
    ///
    /// let mut sync = DualMediaSync::new();
    /// sync.attach(&primary_handle, &glow_handle);
    /// primary.set_current_time(42.0);
    /// assert_eq!(glow.current_time(), 42.0);
    ///
    /// sync.detach();
    /// assert_eq!(primary.listener_count(), 0);
    /// ```
    pub fn attach(&mut self, primary: &Arc<dyn MediaHandle>, glow: &Arc<dyn MediaHandle>) {
        self.detach();

        let weak_primary = Arc::downgrade(primary);
        let weak_glow = Arc::downgrade(glow);

        let on_play = {
            let glow = weak_glow.clone();
            primary.add_listener(
                MediaEvent::Play,
                Arc::new(move || {
                    let Some(glow) = glow.upgrade() else {
                        return;
                    };
                    // The glow is decorative: a refused play must never reach the user.
                    if let Err(error) = glow.play() {
                        debug!(%error, "glow play failed; ignoring");
                    }
                }),
            )
        };

        let on_pause = {
            let glow = weak_glow.clone();
            primary.add_listener(
                MediaEvent::Pause,
                Arc::new(move || {
                    if let Some(glow) = glow.upgrade() {
                        glow.pause();
                    }
                }),
            )
        };

        let on_seek = {
            let primary_ref = weak_primary.clone();
            let glow = weak_glow;
            primary.add_listener(
                MediaEvent::Seeking,
                Arc::new(move || {
                    let (Some(primary), Some(glow)) = (primary_ref.upgrade(), glow.upgrade())
                    else {
                        return;
                    };
                    // Absolute copy, so drift cannot accumulate across seeks.
                    glow.set_current_time(primary.current_time());
                }),
            )
        };

        let listeners = vec![on_play, on_pause, on_seek];
        debug!(listeners = listeners.len(), "glow sync attached");

        self.attachment = Some(Attachment {
            primary: weak_primary,
            listeners,
        });
    }

    /// Removes every listener registered by the last `attach`.
    ///
    /// Safe to call any number of times.
    pub fn detach(&mut self) {
        if self.attachment.take().is_some() {
            debug!("glow sync detached");
        }
    }

    /// Detach-then-attach transaction for a change of media kind or elements.
    ///
    /// Listeners are attached only in video mode with both elements present.
    pub fn reconcile(&mut self, kind: MediaKind, pair: Option<&MediaPair>) {
        self.detach();
        if kind != MediaKind::Video {
            return;
        }
        if let Some(pair) = pair {
            self.attach(&pair.primary, &pair.glow);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }
}

#[derive(Debug)]
struct Attachment {
    primary: Weak<dyn MediaHandle>,
    listeners: Vec<ListenerId>,
}

impl Drop for Attachment {
    fn drop(&mut self) {
        let listeners = std::mem::take(&mut self.listeners);
        // A dropped primary took its listeners with it.
        let Some(primary) = self.primary.upgrade() else {
            return;
        };
        for id in listeners {
            primary.remove_listener(id);
        }
    }
}
