use std::process::ExitCode;

use ambient::{
    AmbientError, AmbientLightProps, ColorSample, DominantColorSampler, FsImageLoader,
    SamplerState, layout as resolve_layout,
};
use tokio::runtime::Handle;
use tracing::debug;

use crate::args::{LayoutArgs, SampleArgs};

/// Samples each source in turn through one sampler.
///
/// Exits with failure when any source could not be sampled.
pub async fn sample(args: SampleArgs) -> Result<ExitCode, AmbientError> {
    let loader = match args.root {
        Some(root) => FsImageLoader::with_root(root),
        None => FsImageLoader::new(),
    };
    let mut sampler = DominantColorSampler::for_files(Handle::current(), loader);
    let mut updates = sampler.subscribe();
    let mut failures = 0usize;

    for source in &args.sources {
        if source.is_empty() {
            println!("{source}\t{}", format_color(ColorSample::Transparent, args.css));
            continue;
        }
        sampler.set_source(source);
        let snapshot = updates
            .wait_for(|snapshot| {
                snapshot.source.as_deref() == Some(source.as_str())
                    && matches!(snapshot.state, SamplerState::Ready | SamplerState::Failed)
            })
            .await
            .map_err(|error| AmbientError::BackgroundTask(error.to_string()))?
            .clone();
        debug!(source = %source, state = ?snapshot.state, "sampled");

        if snapshot.state == SamplerState::Failed {
            failures += 1;
        }
        println!("{source}\t{}", format_color(snapshot.color, args.css));
    }

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Prints the resolved layout of a props file as JSON.
pub fn layout(args: LayoutArgs) -> Result<ExitCode, AmbientError> {
    let props = AmbientLightProps::from_json_file(&args.props)?;
    let resolved = resolve_layout(&props, args.children);
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(ExitCode::SUCCESS)
}

fn format_color(color: ColorSample, css: bool) -> String {
    if css {
        return color.to_css();
    }
    match color.channels() {
        Some([r, g, b]) => format!("#{r:02x}{g:02x}{b:02x}"),
        None => "transparent".to_owned(),
    }
}
