use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "nowplaying")]
#[command(about = "Now playing widget for MPRIS media players")]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of ~/.config/nowplaying/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to a daily rolling file
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: MediaCommand,
}

/// Widget and player commands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum MediaCommand {
    /// Show a live status line until Ctrl-C
    Watch,

    /// Print the current playback state
    Status {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Start playback
    Play,

    /// Pause playback
    Pause,

    /// Skip to the next track
    Next,

    /// Go to the previous track
    Previous,

    /// Jump backwards by the configured skip step
    Rewind,

    /// Jump forwards by the configured skip step
    FastForward,

    /// Seek within the current track
    Seek {
        /// Seconds (30), time (1:30), percentage (50%) or relative (+10, -10)
        #[arg(allow_hyphen_values = true)]
        position: String,
    },

    /// Read or set the player volume
    Volume {
        /// Level between 0.0 and 1.0
        level: Option<f64>,
    },

    /// Print the configuration JSON schema
    Schema,
}
