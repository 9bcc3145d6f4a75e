use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "SurfaceLink",
    version = surfacelink_core::version(),
    about = "SurfaceLink - headless host for the activity/surface bridge",
)]
pub struct Args {
    /// Specify custom configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Validate configuration and exit without starting
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Use default configuration and ignore config files
    #[arg(long = "defaults")]
    pub use_defaults: bool,

    /// Host steps to play, as YAML. Plays the built-in rotate scenario when omitted
    #[arg(short = 's', long = "scenario", value_name = "FILE")]
    pub scenario_path: Option<PathBuf>,

    /// Only log info and above
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log everything, including each relayed surface callback
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// How long to keep the worker rendering after the scenario ends
    #[arg(long = "hold-ms", value_name = "MS", default_value_t = 500)]
    pub hold_ms: u64,

    /// Frame interval of the demo runtime
    #[arg(long = "frame-ms", value_name = "MS", default_value_t = 16)]
    pub frame_ms: u64,
}

pub fn parse_args() -> Args {
    Args::parse()
}
