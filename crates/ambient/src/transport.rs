use std::sync::{Mutex, MutexGuard};

use tracing::trace;

use crate::media::{Listener, ListenerId, MediaError, MediaEvent, MediaHandle};

/// In-memory [`MediaHandle`] with no decoder behind it.
///
/// Tracks paused/playing state and position, dispatches `Play`/`Pause` only
/// on actual state changes (like a media element does) and `Seeking` on every
/// position change. Command counters and an injectable play rejection make it
/// usable as a test double and as a stand-in transport for headless hosts.
///
/// # Example
/// ```
/// use ambient::{HeadlessTransport, MediaHandle};
///
/// let media = HeadlessTransport::new();
/// media.play().expect("play");
/// media.set_current_time(12.5);
///
/// assert!(!media.is_paused());
/// assert_eq!(media.current_time(), 12.5);
/// assert_eq!(media.play_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct HeadlessTransport {
    inner: Mutex<TransportState>,
}

#[derive(Default)]
struct TransportState {
    playing: bool,
    position: f64,
    next_listener_id: u64,
    listeners: Vec<(ListenerId, MediaEvent, Listener)>,
    play_rejection: Option<MediaError>,
    play_count: usize,
    pause_count: usize,
    seek_count: usize,
}

impl std::fmt::Debug for TransportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportState")
            .field("playing", &self.playing)
            .field("position", &self.position)
            .field("listeners", &self.listeners.len())
            .field("play_rejection", &self.play_rejection)
            .finish()
    }
}

impl HeadlessTransport {
    /// Creates a paused transport at position zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `play` fail with `error` until cleared with `None`.
    pub fn reject_play_with(&self, error: Option<MediaError>) {
        self.lock().play_rejection = error;
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count_for(&self, event: MediaEvent) -> usize {
        self.lock()
            .listeners
            .iter()
            .filter(|(_, registered, _)| *registered == event)
            .count()
    }

    /// Number of `play` commands received, including rejected ones.
    pub fn play_count(&self) -> usize {
        self.lock().play_count
    }

    pub fn pause_count(&self) -> usize {
        self.lock().pause_count
    }

    pub fn seek_count(&self) -> usize {
        self.lock().seek_count
    }

    fn lock(&self) -> MutexGuard<'_, TransportState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn dispatch(&self, event: MediaEvent) {
        // Snapshot first: listeners may call back into this transport.
        let listeners: Vec<Listener> = self
            .lock()
            .listeners
            .iter()
            .filter(|(_, registered, _)| *registered == event)
            .map(|(_, _, listener)| listener.clone())
            .collect();
        trace!(?event, listeners = listeners.len(), "dispatching media event");
        for listener in listeners {
            listener();
        }
    }
}

impl MediaHandle for HeadlessTransport {
    fn add_listener(&self, event: MediaEvent, listener: Listener) -> ListenerId {
        let mut state = self.lock();
        let id = ListenerId(state.next_listener_id);
        state.next_listener_id += 1;
        state.listeners.push((id, event, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut state = self.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(registered, _, _)| *registered != id);
        state.listeners.len() != before
    }

    fn play(&self) -> Result<(), MediaError> {
        let started = {
            let mut state = self.lock();
            state.play_count += 1;
            if let Some(error) = state.play_rejection.clone() {
                return Err(error);
            }
            let started = !state.playing;
            state.playing = true;
            started
        };
        if started {
            self.dispatch(MediaEvent::Play);
        }
        Ok(())
    }

    fn pause(&self) {
        let stopped = {
            let mut state = self.lock();
            state.pause_count += 1;
            let stopped = state.playing;
            state.playing = false;
            stopped
        };
        if stopped {
            self.dispatch(MediaEvent::Pause);
        }
    }

    fn current_time(&self) -> f64 {
        self.lock().position
    }

    fn set_current_time(&self, seconds: f64) {
        {
            let mut state = self.lock();
            state.seek_count += 1;
            state.position = seconds;
        }
        self.dispatch(MediaEvent::Seeking);
    }

    fn is_paused(&self) -> bool {
        !self.lock().playing
    }
}
