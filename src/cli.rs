use clap::Parser;
use std::path::PathBuf;

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Target: ",
    std::env::consts::ARCH,
    "-",
    std::env::consts::OS
);

/// Scroll-driven image sequence scrubber
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Frame pattern ("frames#####.png", "frames%05d.png"), glob
    /// ("frames*.png"), or directory of frames
    #[arg(value_name = "PATTERN_OR_DIR")]
    pub input: Option<PathBuf>,

    /// Explicit frame files in order (can be specified multiple times,
    /// overrides PATTERN_OR_DIR)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// First frame number for pattern expansion
    #[arg(long = "start", value_name = "N", default_value_t = 0)]
    pub start: usize,

    /// Frame number step for pattern expansion
    #[arg(long = "step", value_name = "N", default_value_t = 1)]
    pub step: usize,

    /// Frame count for pattern expansion (required for # / %0Nd patterns)
    #[arg(short = 'n', long = "frames", value_name = "N")]
    pub frames: Option<usize>,

    /// Canvas size in pixels
    #[arg(long = "size", value_names = ["W", "H"], num_args = 2, default_values = ["1280", "720"])]
    pub size: Vec<u32>,

    /// Total scroll distance in scroll units
    #[arg(long = "distance", value_name = "UNITS", default_value_t = 2500.0)]
    pub distance: f64,

    /// Scroll step per sweep iteration
    #[arg(long = "scroll-step", value_name = "UNITS", default_value_t = 25.0)]
    pub scroll_step: f64,

    /// Pin configuration as JSON: {"trigger":"...","distance":N}
    #[arg(long = "pin", value_name = "JSON")]
    pub pin: Option<String>,

    /// Directory for canvas PNG snapshots (no snapshots if omitted)
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Snapshot every N sweep iterations
    #[arg(long = "snapshot-every", value_name = "N", default_value_t = 10)]
    pub snapshot_every: usize,

    /// Worker threads override (default: 75% of CPU cores)
    #[arg(long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Enable debug logging to file (default: scrubba.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
