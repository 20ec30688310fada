use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Transport events a media element reports to its listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEvent {
    /// Playback started after being paused.
    Play,
    /// Playback paused.
    Pause,
    /// The playback position was changed by a seek.
    Seeking,
}

/// Handle returned by [`MediaHandle::add_listener`], used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Callback invoked when a subscribed [`MediaEvent`] fires.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Failure of a transport command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// Playback was refused, e.g. by an autoplay policy.
    PlaybackRejected { reason: String },
    /// The media could not be decoded.
    Decode { reason: String },
}

impl Display for MediaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlaybackRejected { reason } => write!(f, "playback rejected: {reason}"),
            Self::Decode { reason } => write!(f, "media decode failed: {reason}"),
        }
    }
}

impl std::error::Error for MediaError {}

/// A playable media instance owned by the host.
///
/// Implementations must tolerate listeners being added or removed from
/// inside another listener, and must not hold internal locks while invoking
/// listeners.
pub trait MediaHandle: Send + Sync {
    /// Registers `listener` for `event`.
    fn add_listener(&self, event: MediaEvent, listener: Listener) -> ListenerId;

    /// Removes a listener. Returns `false` when `id` is not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Starts playback.
    fn play(&self) -> Result<(), MediaError>;

    /// Pauses playback.
    fn pause(&self);

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Moves the playback position to `seconds`.
    fn set_current_time(&self, seconds: f64);

    fn is_paused(&self) -> bool;
}

/// The two media elements of one video-mode session.
///
/// `primary` is the foreground, user-facing element; `glow` is the silent
/// decorative copy behind it.
#[derive(Clone)]
pub struct MediaPair {
    pub primary: Arc<dyn MediaHandle>,
    pub glow: Arc<dyn MediaHandle>,
}

impl MediaPair {
    pub fn new(primary: Arc<dyn MediaHandle>, glow: Arc<dyn MediaHandle>) -> Self {
        Self { primary, glow }
    }

    /// True when both pairs reference the same two elements.
    pub fn same_elements(&self, other: &MediaPair) -> bool {
        Arc::ptr_eq(&self.primary, &other.primary) && Arc::ptr_eq(&self.glow, &other.glow)
    }
}

impl std::fmt::Debug for MediaPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPair")
            .field("primary", &Arc::as_ptr(&self.primary))
            .field("glow", &Arc::as_ptr(&self.glow))
            .finish()
    }
}
