use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dino_vis::{
    config::Config,
    render::{JsonLinesRenderer, Renderer, TraceRenderer},
    session::Session,
    source::{FillerSource, FrameFileSource, FrequencySource, NoiseParams, NoiseSource},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceKind {
    /// No signal: every tick uses the filler frame
    Filler,
    /// Seeded pseudo-random spectra with periodic bursts
    Noise,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputKind {
    /// Human-readable log lines
    Log,
    /// One JSON object per tick on stdout
    Json,
}

#[derive(Parser)]
#[command(
    name = "dino-vis",
    version,
    about = "Drive audio-reactive dynamics from frequency frames",
    long_about = "dino-vis turns frequency-magnitude frames into intensity, variance, change and peak signals, advances the scene motion, and reports every tick."
)]
struct Cli {
    /// Text file with one frame of magnitudes per line
    #[arg(short, long)]
    frames: Option<PathBuf>,

    /// Synthetic source used when no frame file is given
    #[arg(short, long, value_enum, default_value = "filler")]
    source: SourceKind,

    /// Stop after this many ticks (synthetic sources default to 600)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Override the configured tick rate (0 = as fast as possible)
    #[arg(long)]
    fps: Option<f64>,

    /// Seed for the noise source
    #[arg(long)]
    seed: Option<u64>,

    /// Skip rejected frames instead of stopping
    #[arg(long)]
    skip_invalid: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "log")]
    output: OutputKind,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting dino-vis v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    if let Some(fps) = cli.fps {
        config.session.fps = fps;
    }
    if cli.skip_invalid {
        config.session.skip_invalid = true;
    }
    config.validate()?;

    let frame_length = config.dynamics.frame_length;
    let (source, max_ticks): (Box<dyn FrequencySource>, Option<u64>) = match &cli.frames {
        Some(path) => {
            let source = FrameFileSource::load(path, frame_length).await?;
            (Box::new(source) as Box<dyn FrequencySource>, cli.ticks)
        }
        None => {
            let source: Box<dyn FrequencySource> = match cli.source {
                SourceKind::Filler => Box::new(FillerSource::new(frame_length)),
                SourceKind::Noise => {
                    let mut params = NoiseParams::default();
                    if let Some(seed) = cli.seed {
                        params.seed = seed;
                    }
                    Box::new(NoiseSource::new(frame_length, config.dynamics.max_magnitude, params)?)
                }
            };
            (source, Some(cli.ticks.unwrap_or(600)))
        }
    };

    let mut session = Session::new(&config, source)?;

    let mut renderer: Box<dyn Renderer> = match cli.output {
        OutputKind::Log => Box::new(TraceRenderer::new()),
        OutputKind::Json => Box::new(JsonLinesRenderer::new(BufWriter::new(std::io::stdout().lock()))),
    };

    let summary = session.run(renderer.as_mut(), max_ticks).await.map_err(|e| {
        anyhow::anyhow!(e.user_message())
    })?;

    info!(
        "Done: {} ticks, {} peaks, {} skipped",
        summary.ticks, summary.peaks, summary.skipped
    );
    Ok(())
}
