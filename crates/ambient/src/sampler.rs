use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::color::ColorSample;
use crate::error::AmbientError;
use crate::loader::{CrossOrigin, FsImageLoader, ImageLoader};
use crate::surface::{SoftwareSurfaceFactory, SurfaceFactory, sample_bitmap};

/// Identifier of one sampling attempt, unique per sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Lifecycle of the sampler's current source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SamplerState {
    /// No source.
    #[default]
    Idle,
    /// A bitmap load is in flight; the previous color is still current.
    Loading,
    /// The color of the current source is published.
    Ready,
    /// Loading or sampling failed; the color is transparent.
    Failed,
}

/// Most recent published value of a sampler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplerSnapshot {
    pub state: SamplerState,
    pub color: ColorSample,
    pub source: Option<String>,
    /// Request allowed to publish, `None` when idle or detached.
    pub request: Option<RequestId>,
}

/// One in-flight attempt to load and sample a source.
///
/// Superseding a request cancels its token; a superseded request never
/// publishes, whether it later succeeds or fails.
#[derive(Debug, Clone)]
pub struct SampleRequest {
    id: RequestId,
    source: String,
    token: CancellationToken,
}

impl SampleRequest {
    fn new(id: RequestId, source: String) -> Self {
        Self {
            id,
            source,
            token: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_superseded(&self) -> bool {
        self.token.is_cancelled()
    }

    fn supersede(&self) {
        self.token.cancel();
    }
}

/// Derives one accent color from the bitmap behind a source identifier.
///
/// Each non-empty source change starts a [`SampleRequest`] on `runtime` and
/// supersedes the previous one, so only the latest source's outcome is ever
/// published even when older loads finish later. Failures never escape: they
/// publish [`ColorSample::Transparent`] with [`SamplerState::Failed`].
/// Dropping the sampler detaches it.
pub struct DominantColorSampler<L, F> {
    loader: Arc<L>,
    surfaces: Arc<F>,
    runtime: Handle,
    snapshots: Arc<watch::Sender<SamplerSnapshot>>,
    live: Option<SampleRequest>,
    source: Option<String>,
    next_request_id: u64,
    detached: bool,
}

impl DominantColorSampler<FsImageLoader, SoftwareSurfaceFactory> {
    /// Sampler for local files using the software surface.
    pub fn for_files(runtime: Handle, loader: FsImageLoader) -> Self {
        Self::new(runtime, loader, SoftwareSurfaceFactory)
    }
}

impl<L, F> DominantColorSampler<L, F>
where
    L: ImageLoader,
    F: SurfaceFactory,
{
    /// Creates an idle sampler whose loads run on `runtime`.
    ///
    /// # Example
    /// ```no_run
    /// use ambient::{DominantColorSampler, FsImageLoader, SoftwareSurfaceFactory};
    ///
    /// # async fn demo() {
    /// let mut sampler = DominantColorSampler::new(
    ///     tokio::runtime::Handle::current(),
    ///     FsImageLoader::new(),
    ///     SoftwareSurfaceFactory,
    /// );
    /// let mut updates = sampler.subscribe();
    /// sampler.set_source("poster.jpg");
    /// let _ = updates.changed().await;
    /// println!("accent: {}", sampler.color());
    /// # }
    /// ```
    pub fn new(runtime: Handle, loader: L, surfaces: F) -> Self {
        Self::with_shared(runtime, Arc::new(loader), Arc::new(surfaces))
    }

    /// Like [`Self::new`] with a loader and factory shared with the caller.
    pub fn with_shared(runtime: Handle, loader: Arc<L>, surfaces: Arc<F>) -> Self {
        let (snapshots, _) = watch::channel(SamplerSnapshot::default());
        Self {
            loader,
            surfaces,
            runtime,
            snapshots: Arc::new(snapshots),
            live: None,
            source: None,
            next_request_id: 1,
            detached: false,
        }
    }

    /// Points the sampler at `source`.
    ///
    /// An empty source is the same as [`Self::clear`]. Re-setting the current
    /// source is a no-op.
    pub fn set_source(&mut self, source: &str) {
        if self.detached {
            debug!(source, "sampler detached; ignoring source change");
            return;
        }
        if source.is_empty() {
            self.clear();
            return;
        }
        if self.source.as_deref() == Some(source) {
            return;
        }

        self.supersede_live();
        let request = SampleRequest::new(self.allocate_request_id(), source.to_owned());
        self.source = Some(source.to_owned());
        self.snapshots.send_modify(|snapshot| {
            snapshot.state = SamplerState::Loading;
            snapshot.source = Some(request.source.clone());
            snapshot.request = Some(request.id);
        });
        debug!(request = request.id.0, source, "sample request started");

        self.runtime.spawn(run_request(
            self.loader.clone(),
            self.surfaces.clone(),
            request.clone(),
            self.snapshots.clone(),
        ));
        self.live = Some(request);
    }

    /// Drops the current source: idle and transparent, no load.
    pub fn clear(&mut self) {
        self.supersede_live();
        self.source = None;
        if self.detached {
            return;
        }
        self.snapshots.send_if_modified(|snapshot| {
            let idle = SamplerSnapshot::default();
            if *snapshot == idle {
                return false;
            }
            *snapshot = idle;
            true
        });
    }

    /// Stops the sampler for good: the live request is superseded and nothing
    /// is published afterwards.
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.supersede_live();
        // Revoke the publish slot without notifying anyone.
        self.snapshots.send_if_modified(|snapshot| {
            snapshot.request = None;
            false
        });
        debug!("sampler detached");
    }

    /// Current color sample.
    pub fn color(&self) -> ColorSample {
        self.snapshots.borrow().color
    }

    pub fn state(&self) -> SamplerState {
        self.snapshots.borrow().state
    }

    pub fn snapshot(&self) -> SamplerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Live view of the most recent snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SamplerSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn live_request(&self) -> Option<&SampleRequest> {
        self.live.as_ref()
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    fn supersede_live(&mut self) {
        if let Some(previous) = self.live.take() {
            previous.supersede();
            debug!(
                request = previous.id.0,
                source = %previous.source,
                "sample request superseded"
            );
        }
    }

    fn allocate_request_id(&mut self) -> RequestId {
        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        id
    }
}

impl<L, F> Drop for DominantColorSampler<L, F> {
    fn drop(&mut self) {
        if let Some(live) = self.live.take() {
            live.supersede();
        }
        self.snapshots.send_if_modified(|snapshot| {
            snapshot.request = None;
            false
        });
    }
}

impl<L, F> std::fmt::Debug for DominantColorSampler<L, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DominantColorSampler")
            .field("snapshot", &*self.snapshots.borrow())
            .field("live", &self.live)
            .field("detached", &self.detached)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureStage {
    Load,
    Sample,
}

async fn run_request<L, F>(
    loader: Arc<L>,
    surfaces: Arc<F>,
    request: SampleRequest,
    snapshots: Arc<watch::Sender<SamplerSnapshot>>,
) where
    L: ImageLoader,
    F: SurfaceFactory,
{
    let loaded = tokio::select! {
        biased;
        () = request.token.cancelled() => {
            debug!(request = request.id.0, source = %request.source, "load abandoned");
            return;
        }
        loaded = loader.load(&request.source, CrossOrigin::Anonymous) => loaded,
    };

    let outcome = match loaded {
        Ok(bitmap) => sample_bitmap(surfaces.as_ref(), &bitmap)
            .map_err(|error| (FailureStage::Sample, error)),
        Err(error) => Err((FailureStage::Load, error)),
    };
    let (state, color) = match &outcome {
        Ok(color) => (SamplerState::Ready, *color),
        Err(_) => (SamplerState::Failed, ColorSample::Transparent),
    };

    // Both checks run under the channel's write lock, so a concurrent
    // `set_source` either lands before (and wins) or after this publish.
    let published = snapshots.send_if_modified(|snapshot| {
        if request.is_superseded() || snapshot.request != Some(request.id) {
            return false;
        }
        snapshot.state = state;
        snapshot.color = color;
        true
    });

    if !published {
        debug!(
            request = request.id.0,
            source = %request.source,
            "discarding outcome of superseded request"
        );
        return;
    }

    match outcome {
        Ok(color) => info!(request = request.id.0, source = %request.source, %color, "dominant color ready"),
        Err((stage, error)) => log_failure(&request, stage, &error),
    }
}

fn log_failure(request: &SampleRequest, stage: FailureStage, error: &AmbientError) {
    match (stage, error) {
        (FailureStage::Sample, _) | (_, AmbientError::SurfaceUnavailable { .. }) => error!(
            request = request.id.0,
            source = %request.source,
            %error,
            "failed to extract dominant color"
        ),
        (FailureStage::Load, _) => warn!(
            request = request.id.0,
            source = %request.source,
            %error,
            "failed to load image for color sampling"
        ),
    }
}
