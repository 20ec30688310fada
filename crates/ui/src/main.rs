mod app;
mod bridge;
mod widgets;

use tracing_subscriber::EnvFilter;

use app::AppState;

fn main() -> iced::Result {
    init_tracing();

    let runtime = match app::sampler_runtime() {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!(%error, "failed to start the sampler runtime");
            std::process::exit(1);
        }
    };
    let component = match app::viewer_component() {
        Ok(component) => component,
        Err(error) => {
            tracing::error!(%error, "invalid glow props");
            std::process::exit(1);
        }
    };

    iced::application("Ambient Glow", AppState::update, AppState::view)
        .subscription(AppState::subscription)
        .run_with(move || AppState::boot(runtime, component))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
