use std::path::PathBuf;

use clap::Parser;

use nekotoy::app::{self, RunOptions};
use nekotoy::config::{Capabilities, SimConfig, Viewport};

/// Run the cats headless with a scripted pointer tour.
#[derive(Debug, Parser)]
#[command(name = "nekotoy", version, about)]
struct Args {
    /// TOML config file; CLI flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run.
    #[arg(short, long, default_value_t = 60.0)]
    seconds: f64,

    /// Viewport width in pixels.
    #[arg(long)]
    width: Option<f32>,

    /// Viewport height in pixels.
    #[arg(long)]
    height: Option<f32>,

    /// RNG seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of cats.
    #[arg(long)]
    cat_count: Option<usize>,

    /// Pretend the host asked for reduced motion.
    #[arg(long)]
    reduced_motion: bool,

    /// Pace frames at wall-clock speed instead of running flat out.
    #[arg(long)]
    realtime: bool,
}

fn build_options(args: Args) -> Result<RunOptions, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if args.width.is_some() || args.height.is_some() {
        config.viewport = Viewport::new(
            args.width.unwrap_or(config.viewport.width),
            args.height.unwrap_or(config.viewport.height),
        );
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.cat_count.is_some() {
        config.cat_count = args.cat_count;
    }
    config.validate()?;

    Ok(RunOptions {
        config,
        caps: Capabilities {
            reduced_motion: args.reduced_motion,
        },
        seconds: args.seconds,
        realtime: args.realtime,
    })
}

fn main() {
    env_logger::init();
    log::info!("nekotoy starting up");

    let args = Args::parse();
    let result = build_options(args).and_then(app::run);
    if let Err(e) = result {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
