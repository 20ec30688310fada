use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ambient", about = "Ambient glow tooling")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the dominant (box-filtered mean) color of each image source
    Sample(SampleArgs),
    /// Print the resolved glow/content layers for a props JSON file
    Layout(LayoutArgs),
}

#[derive(clap::Args, Debug)]
pub struct SampleArgs {
    /// Image paths or file:// URLs
    #[arg(required = true)]
    pub sources: Vec<String>,

    /// Directory relative sources are resolved against
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Print colors as CSS text instead of hex
    #[arg(long)]
    pub css: bool,
}

#[derive(clap::Args, Debug)]
pub struct LayoutArgs {
    /// Props JSON file (camelCase keys, all optional)
    pub props: PathBuf,

    /// Include the children overlay layer
    #[arg(long)]
    pub children: bool,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Args, Command};

    #[test]
    fn sample_accepts_several_sources_and_flags() {
        let args = Args::parse_from(["ambient", "sample", "a.jpg", "b.png", "--css", "--root", "/m"]);

        let Command::Sample(sample) = args.command else {
            panic!("expected sample command");
        };
        assert_eq!(sample.sources, vec!["a.jpg", "b.png"]);
        assert!(sample.css);
        assert_eq!(sample.root.as_deref(), Some(std::path::Path::new("/m")));
    }

    #[test]
    fn sample_requires_a_source() {
        assert!(Args::try_parse_from(["ambient", "sample"]).is_err());
    }
}
