use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use orbitfield::{Backdrop, OrbitfieldError, SceneConfig, SurfaceSize};

#[derive(Parser, Debug)]
#[command(name = "orbitfield", version, about)]
struct Cli {
    /// Scene configuration as JSON. Missing fields use the defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for a repeatable scene.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Render headlessly to this PNG instead of opening a window.
    #[arg(long, value_name = "OUT.png")]
    snapshot: Option<PathBuf>,

    /// Frames to simulate before taking the snapshot.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Snapshot size as WIDTHxHEIGHT.
    #[arg(long, default_value = "1280x720")]
    size: SurfaceSize,

    /// Log filter directive, e.g. `orbitfield=debug`.
    #[arg(long)]
    log_level: Option<String>,
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orbitfield=info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: Cli) -> Result<(), OrbitfieldError> {
    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    let mut backdrop = Backdrop::new().with_config(config);
    if let Some(seed) = cli.seed {
        backdrop = backdrop.with_seed(seed);
    }

    match &cli.snapshot {
        Some(path) => Ok(backdrop.save_snapshot(path, cli.size, cli.frames)?),
        None => backdrop.run(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("orbitfield: {err}");
            ExitCode::FAILURE
        }
    }
}
