use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use frame_curves_core::{
    AppConfig, CsvDialect, Curve, CurveError, RecordingSettings, SeriesRecorder,
};
use tracing_subscriber::EnvFilter;

fn main() -> frame_curves_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sample { config, start, end } => run_sample(&config, start, end),
        Commands::Record {
            config,
            output,
            dialect,
        } => run_record(&config, output, dialect),
    }
}

fn run_sample(config: &Path, start: u64, end: Option<u64>) -> frame_curves_core::Result<()> {
    let config = AppConfig::from_path(config)?;
    let end = match (end, config.timeline.total_frames) {
        (Some(end), _) => end,
        (None, Some(total)) => total.saturating_sub(1),
        (None, None) => {
            return Err(CurveError::configuration(
                "an end frame is required when the timeline has no total frame count",
            ))
        }
    };
    tracing::info!(kind = config.curve.kind(), start, end, "sampling curve");

    println!("frame,value,rounded");
    for frame in start..=end {
        let timeline = config.timeline.timeline_at(frame)?;
        let result = config.curve.evaluate(&timeline)?;
        println!("{frame},{},{}", result.value, result.rounded);
    }
    Ok(())
}

fn run_record(config: &Path, output: PathBuf, dialect: CsvDialect) -> frame_curves_core::Result<()> {
    let config = AppConfig::from_path(config)?;
    let total = config.timeline.total_frames.ok_or_else(|| {
        CurveError::configuration("recording requires a total frame count in the timeline")
    })?;
    tracing::info!(kind = config.curve.kind(), total, output = %output.display(), "recording curve");

    let recorder = SeriesRecorder::new(RecordingSettings {
        output_path: output,
        dialect,
    });
    for frame in 0..total {
        let timeline = config.timeline.timeline_at(frame)?;
        let result = config.curve.evaluate(&timeline)?;
        recorder.record(&timeline, result.value)?;
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Per-frame animation curve evaluator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the configured curve's value for a range of frames.
    Sample {
        /// JSON file describing the timeline and the curve.
        #[arg(short, long)]
        config: PathBuf,
        /// First frame to evaluate.
        #[arg(long, default_value_t = 0)]
        start: u64,
        /// Last frame to evaluate, inclusive. Defaults to the end of the run.
        #[arg(long)]
        end: Option<u64>,
    },
    /// Evaluate the whole run and write it as a frames-based time series.
    Record {
        /// JSON file describing the timeline and the curve.
        #[arg(short, long)]
        config: PathBuf,
        /// Destination file, truncated on the first frame.
        #[arg(short, long)]
        output: PathBuf,
        /// Delimiter convention: excel, excel-tab or unix.
        #[arg(long, default_value = "excel")]
        dialect: CsvDialect,
    },
}
