use anyhow::Result;
use clap::{Parser, ValueEnum};
use sortex_experiment::Strategy;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod app;
mod settings;

use app::{App, ExportTargets};
use settings::load_settings;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Autoplay {
    Correct,
    Perseverate,
    Random,
}

impl From<Autoplay> for Strategy {
    fn from(value: Autoplay) -> Self {
        match value {
            Autoplay::Correct => Strategy::Correct,
            Autoplay::Perseverate => Strategy::Perseverate,
            Autoplay::Random => Strategy::Random,
        }
    }
}

/// Sort animals and shapes into buckets; the rule flips halfway through.
#[derive(Debug, Parser)]
#[command(name = "sortex", version)]
struct Args {
    /// Settings file (defaults to ./sortex.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Let a simulated participant play instead of reading stdin
    #[arg(long, value_enum)]
    autoplay: Option<Autoplay>,

    /// Seed for the random participant
    #[arg(long)]
    seed: Option<u64>,

    /// Feedback delay in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Write responses and summary as JSON when the session finishes
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Write the results timeline as PNG when the session finishes
    #[arg(long)]
    timeline_png: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(ms) = args.delay_ms {
        settings.session.feedback_delay_ms = ms;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let exports = ExportTargets {
        json: args.export_json,
        timeline_png: args.timeline_png,
        png_size: (960, 240),
    };
    let app = App::new(settings, exports);

    match args.autoplay {
        Some(strategy) => app.run_autoplay(strategy.into(), args.seed),
        None => app.run_interactive(),
    }
}
