use std::path::PathBuf;
use std::sync::Arc;

use ambient::{
    AmbientLight, AmbientLightProps, ColorSample, DominantColorSampler, FsImageLoader,
    MediaCallbacks, MediaKind, SamplerSnapshot, SamplerState, SoftwareSurfaceFactory,
};
use iced::widget::{button, column, container, row, slider, text, text_input};
use iced::{Background, Element, Length, Subscription, Task};
use raster::Bitmap;
use tokio::runtime::{self, Runtime};
use tracing::{info, warn};

use crate::bridge::sampler_subscription;
use crate::widgets::glow::{self, GlowImages};

const SAMPLER_WORKER_THREADS: usize = 1;

type Sampler = DominantColorSampler<FsImageLoader, SoftwareSurfaceFactory>;

/// Decoded source plus the images derived from it.
#[derive(Debug, Clone)]
pub struct LoadedMedia {
    base: Arc<Bitmap>,
    blur: f64,
    images: GlowImages,
}

/// UI messages handled by the iced app update loop.
#[derive(Debug, Clone)]
pub enum Message {
    SourceChanged(String),
    OpenPressed,
    BlurChanged(f64),
    OpacityChanged(f64),
    MediaLoaded(u64, Result<LoadedMedia, String>),
    GlowRebuilt(u64, Result<(f64, GlowImages), String>),
    Sampler(SamplerSnapshot),
}

/// Builds the runtime that drives sampling and decoding off the UI thread.
pub fn sampler_runtime() -> std::io::Result<Runtime> {
    runtime::Builder::new_multi_thread()
        .worker_threads(SAMPLER_WORKER_THREADS)
        .thread_name("ambient-sampler")
        .enable_all()
        .build()
}

/// Root UI state of the glow viewer.
pub struct AppState {
    // Declared before `runtime` so in-flight sample requests are revoked first.
    sampler: Sampler,
    runtime: Runtime,
    loader: FsImageLoader,
    component: AmbientLight,
    source_input: String,
    snapshot: SamplerSnapshot,
    media: Option<LoadedMedia>,
    generation: u64,
    status: String,
}

impl AppState {
    /// Boots the app on `runtime`.
    pub fn boot(runtime: Runtime, component: AmbientLight) -> (Self, Task<Message>) {
        let mut app = Self::from_parts(runtime, component);
        app.component.mount(None);
        (app, Task::none())
    }

    fn from_parts(runtime: Runtime, component: AmbientLight) -> Self {
        let loader = FsImageLoader::new();
        let sampler = DominantColorSampler::for_files(runtime.handle().clone(), loader.clone());
        Self {
            sampler,
            runtime,
            loader,
            component,
            source_input: String::new(),
            snapshot: SamplerSnapshot::default(),
            media: None,
            generation: 0,
            status: String::from("open an image to light it up"),
        }
    }

    /// Handles one UI message.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SourceChanged(source) => {
                self.source_input = source;
            }
            Message::OpenPressed => return self.open_source(),
            Message::BlurChanged(blur) => {
                let props = AmbientLightProps {
                    blur,
                    ..self.component.props().clone()
                };
                if self.apply_props(props) {
                    return self.rebuild_glow();
                }
            }
            Message::OpacityChanged(opacity) => {
                let props = AmbientLightProps {
                    opacity,
                    ..self.component.props().clone()
                };
                self.apply_props(props);
            }
            Message::MediaLoaded(generation, result) => {
                if generation != self.generation {
                    return Task::none();
                }
                match result {
                    Ok(media) => {
                        let stale_blur = media.blur != self.component.props().blur;
                        self.media = Some(media);
                        self.status = format!("showing {}", self.component.props().src);
                        self.component.notify_loaded();
                        if stale_blur {
                            return self.rebuild_glow();
                        }
                    }
                    Err(error) => {
                        self.media = None;
                        self.status = format!("error: {error}");
                        self.component.notify_error();
                    }
                }
            }
            Message::GlowRebuilt(generation, result) => {
                if generation != self.generation {
                    return Task::none();
                }
                match (result, self.media.as_mut()) {
                    (Ok((blur, images)), Some(media)) => {
                        media.blur = blur;
                        media.images = images;
                    }
                    (Err(error), _) => self.status = format!("error: {error}"),
                    (Ok(_), None) => {}
                }
            }
            Message::Sampler(snapshot) => {
                if snapshot.state == SamplerState::Failed {
                    self.status = String::from("could not sample a color");
                }
                self.snapshot = snapshot;
            }
        }

        Task::none()
    }

    fn open_source(&mut self) -> Task<Message> {
        let source = self.source_input.trim().to_owned();
        if source.is_empty() {
            self.status = String::from("source is empty");
            return Task::none();
        }

        let path = match self.loader.resolve(&source) {
            Ok(path) => path,
            Err(error) => {
                self.status = format!("error: {error}");
                return Task::none();
            }
        };

        let props = AmbientLightProps {
            src: source.clone(),
            ..self.component.props().clone()
        };
        if !self.apply_props(props) {
            return Task::none();
        }

        self.generation += 1;
        self.media = None;
        self.sampler.set_source(&source);
        self.status = format!("loading {source}");

        let generation = self.generation;
        let blur = self.component.props().blur;
        let handle = self.runtime.handle().clone();
        Task::perform(
            async move {
                handle
                    .spawn_blocking(move || load_media(path, blur))
                    .await
                    .map_err(|error| error.to_string())?
            },
            move |result| Message::MediaLoaded(generation, result),
        )
    }

    fn rebuild_glow(&mut self) -> Task<Message> {
        let Some(media) = self.media.as_ref() else {
            return Task::none();
        };

        // A rebuild supersedes any earlier rebuild but not the loaded source.
        self.generation += 1;
        let generation = self.generation;
        let base = Arc::clone(&media.base);
        let blur = self.component.props().blur;
        let handle = self.runtime.handle().clone();
        Task::perform(
            async move {
                handle
                    .spawn_blocking(move || {
                        raster::glow_bitmap(&base, blur)
                            .map(|glow| (blur, GlowImages::from_bitmaps(&base, &glow)))
                            .map_err(|error| error.to_string())
                    })
                    .await
                    .map_err(|error| error.to_string())?
            },
            move |result| Message::GlowRebuilt(generation, result),
        )
    }

    fn apply_props(&mut self, props: AmbientLightProps) -> bool {
        match self.component.set_props(props) {
            Ok(()) => true,
            Err(error) => {
                self.status = format!("error: {error}");
                false
            }
        }
    }

    /// Current accent color published by the sampler.
    pub fn accent(&self) -> ColorSample {
        self.snapshot.color
    }

    /// Renders the UI tree.
    pub fn view(&self) -> Element<'_, Message> {
        let props = self.component.props();
        let layout = self.component.layout();

        let source_row = row![
            text_input("image path", &self.source_input)
                .on_input(Message::SourceChanged)
                .on_submit(Message::OpenPressed),
            button("Open").on_press(Message::OpenPressed),
        ]
        .spacing(12);

        let controls = column![
            source_row,
            text(format!("Blur: {:.0}px", props.blur)),
            slider(0.0..=120.0, props.blur, Message::BlurChanged).step(1.0),
            text(format!("Opacity: {:.2}", props.opacity)),
            slider(0.0..=1.0, props.opacity, Message::OpacityChanged).step(0.05),
            text(format!(
                "Accent: {} ({})",
                self.snapshot.color,
                state_label(self.snapshot.state)
            )),
            text(format!("Status: {}", self.status)),
        ]
        .spacing(12)
        .padding(16);

        let preview = glow::view(self.media.as_ref().map(|media| &media.images), &layout);
        let background = glow::accent_background(self.snapshot.color);

        container(column![controls, preview].spacing(12))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme| container::Style {
                background: Some(Background::Color(background)),
                ..container::Style::default()
            })
            .into()
    }

    /// Subscribes to the sampler's published snapshots.
    pub fn subscription(&self) -> Subscription<Message> {
        sampler_subscription(self.sampler.subscribe()).map(Message::Sampler)
    }

    #[cfg(test)]
    fn from_runtime_for_test(runtime: Runtime) -> Self {
        let component = AmbientLight::new(AmbientLightProps::default(), MediaCallbacks::default())
            .expect("default props are valid");
        Self::from_parts(runtime, component)
    }
}

/// The viewer's component: default image props with logging callbacks.
pub fn viewer_component() -> ambient::Result<AmbientLight> {
    let callbacks = MediaCallbacks::default()
        .on_load(|| info!("content layer loaded"))
        .on_error(|| warn!("content layer failed to load"));
    AmbientLight::new(AmbientLightProps::new("", MediaKind::Image), callbacks)
}

fn load_media(path: PathBuf, blur: f64) -> Result<LoadedMedia, String> {
    let base = raster::decode_bitmap_file(&path).map_err(|error| error.to_string())?;
    let glow = raster::glow_bitmap(&base, blur).map_err(|error| error.to_string())?;
    let images = GlowImages::from_bitmaps(&base, &glow);
    Ok(LoadedMedia {
        base: Arc::new(base),
        blur,
        images,
    })
}

fn state_label(state: SamplerState) -> &'static str {
    match state {
        SamplerState::Idle => "idle",
        SamplerState::Loading => "sampling",
        SamplerState::Ready => "ready",
        SamplerState::Failed => "failed",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ambient::{ColorSample, SamplerSnapshot, SamplerState};
    use raster::Bitmap;
    use tokio::runtime::{self, Runtime};

    use super::{AppState, LoadedMedia, Message};
    use crate::widgets::glow::GlowImages;

    fn test_runtime() -> Runtime {
        runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime")
    }

    fn loaded_media(blur: f64) -> LoadedMedia {
        let base = Bitmap::new(4, 4);
        LoadedMedia {
            images: GlowImages::from_bitmaps(&base, &base),
            base: Arc::new(base),
            blur,
        }
    }

    #[test]
    fn open_with_empty_source_reports_status() {
        let mut app = AppState::from_runtime_for_test(test_runtime());

        let _ = app.update(Message::SourceChanged("   ".to_owned()));
        let _ = app.update(Message::OpenPressed);

        assert_eq!(app.status, "source is empty");
        assert_eq!(app.sampler.state(), SamplerState::Idle);
        assert_eq!(app.generation, 0);
    }

    #[test]
    fn open_rejects_remote_sources_before_sampling() {
        let mut app = AppState::from_runtime_for_test(test_runtime());

        let _ = app.update(Message::SourceChanged("https://example.com/a.png".to_owned()));
        let _ = app.update(Message::OpenPressed);

        assert!(app.status.starts_with("error:"));
        assert_eq!(app.sampler.state(), SamplerState::Idle);
        assert_eq!(app.component.props().src, "");
    }

    #[test]
    fn open_local_source_starts_sampling() {
        let mut app = AppState::from_runtime_for_test(test_runtime());

        let _ = app.update(Message::SourceChanged(" poster.png ".to_owned()));
        let _ = app.update(Message::OpenPressed);

        assert_eq!(app.sampler.state(), SamplerState::Loading);
        assert_eq!(app.sampler.source(), Some("poster.png"));
        assert_eq!(app.component.props().src, "poster.png");
        assert_eq!(app.generation, 1);
        assert_eq!(app.status, "loading poster.png");
    }

    #[test]
    fn sliders_update_glow_props() {
        let mut app = AppState::from_runtime_for_test(test_runtime());

        let _ = app.update(Message::BlurChanged(12.0));
        let _ = app.update(Message::OpacityChanged(0.25));

        assert_eq!(app.component.props().blur, 12.0);
        assert_eq!(app.component.props().opacity, 0.25);
    }

    #[test]
    fn out_of_range_opacity_keeps_previous_props() {
        let mut app = AppState::from_runtime_for_test(test_runtime());

        let _ = app.update(Message::OpacityChanged(1.5));

        assert_eq!(app.component.props().opacity, 0.6);
        assert!(app.status.starts_with("error:"));
    }

    #[test]
    fn stale_media_results_are_ignored() {
        let mut app = AppState::from_runtime_for_test(test_runtime());
        let _ = app.update(Message::SourceChanged("a.png".to_owned()));
        let _ = app.update(Message::OpenPressed);
        let _ = app.update(Message::SourceChanged("b.png".to_owned()));
        let _ = app.update(Message::OpenPressed);

        let _ = app.update(Message::MediaLoaded(1, Err("decode failed".to_owned())));
        assert_eq!(app.status, "loading b.png");

        let _ = app.update(Message::MediaLoaded(2, Ok(loaded_media(40.0))));
        assert!(app.media.is_some());
        assert_eq!(app.status, "showing b.png");
    }

    #[test]
    fn media_decoded_with_an_old_blur_is_rebuilt() {
        let mut app = AppState::from_runtime_for_test(test_runtime());
        let _ = app.update(Message::SourceChanged("a.png".to_owned()));
        let _ = app.update(Message::OpenPressed);
        let _ = app.update(Message::BlurChanged(5.0));

        let _ = app.update(Message::MediaLoaded(1, Ok(loaded_media(40.0))));

        assert_eq!(app.generation, 2);
        let images = loaded_media(5.0).images;
        let _ = app.update(Message::GlowRebuilt(2, Ok((5.0, images))));
        assert_eq!(app.media.as_ref().map(|media| media.blur), Some(5.0));
    }

    #[test]
    fn sampler_snapshot_sets_accent() {
        let mut app = AppState::from_runtime_for_test(test_runtime());

        let _ = app.update(Message::Sampler(SamplerSnapshot {
            state: SamplerState::Ready,
            color: ColorSample::rgb(12, 34, 56),
            ..SamplerSnapshot::default()
        }));

        assert_eq!(app.accent(), ColorSample::rgb(12, 34, 56));
    }

    #[test]
    fn failed_snapshot_reports_status() {
        let mut app = AppState::from_runtime_for_test(test_runtime());

        let _ = app.update(Message::Sampler(SamplerSnapshot {
            state: SamplerState::Failed,
            ..SamplerSnapshot::default()
        }));

        assert!(app.accent().is_transparent());
        assert_eq!(app.status, "could not sample a color");
    }
}
