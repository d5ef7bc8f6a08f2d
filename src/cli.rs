use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "framelift")]
#[command(author, version, about = "Frame-rate uplift tool driving ffmpeg and RIFE")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interpolate a video to a higher frame rate
    Run {
        /// Input video to process
        #[arg(required = true)]
        input: PathBuf,

        /// Target mode: "double" the source rate, or raise to a fixed "60" fps
        #[arg(long, default_value = "double")]
        mode: String,
    },

    /// Probe a video file and display its frame rate
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
