//! glitch-transition - synthesize a stylized transition between two clips.
//!
//! Usage:
//!   glitch-transition [OPTIONS]
//!
//! Extracts the last frame of clip A and the first frame of clip B,
//! interpolates between them with RIFE, assembles the frames into a clip,
//! and applies the glitch bleach effect.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use glitch_core::config::{PipelineConfig, DEFAULT_EXP};
use glitch_core::interp::RifeInterpolator;
use glitch_core::media::FfmpegTranscoder;
use glitch_core::orchestrator::{run_transition_pipeline, Context};
use glitch_core::provision::HttpFetcher;

#[derive(Parser)]
#[command(
    name = "glitch-transition",
    about = "Glitch bleach transition between two video clips",
    version
)]
struct Cli {
    /// Directory containing the input videos
    #[arg(long, default_value = "input")]
    input_dir: PathBuf,

    /// Directory for output files
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Directory of the RIFE checkout (model cache lives under it)
    #[arg(long, default_value = "RIFE")]
    model_dir: PathBuf,

    /// Filename of the first video
    #[arg(long, default_value = "videoA.mp4")]
    clip_a: String,

    /// Filename of the second video
    #[arg(long, default_value = "videoB.mp4")]
    clip_b: String,

    /// Interpolation exponent (2^exp intermediate frames)
    #[arg(long, default_value_t = DEFAULT_EXP)]
    exp: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(final_video) => {
            println!("Final output: {}", final_video.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<PathBuf> {
    let config = PipelineConfig::new(
        &cli.input_dir,
        &cli.output_dir,
        &cli.model_dir,
        cli.clip_a,
        cli.clip_b,
        cli.exp,
    )
    .context("invalid configuration")?;

    let model_dir = config.model_dir.clone();
    let ctx = Context::new(
        config,
        Arc::new(FfmpegTranscoder::new()),
        Arc::new(RifeInterpolator::new(model_dir)),
        Arc::new(HttpFetcher::new()),
    );

    let state = run_transition_pipeline(&ctx)?;

    state
        .final_video()
        .cloned()
        .context("pipeline finished without recording a final video")
}
