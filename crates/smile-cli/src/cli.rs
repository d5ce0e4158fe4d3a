//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

/// Smiling time tracker.
///
/// Reads per-frame smile signals and host lifecycle events as JSON lines and
/// shows how long the subject has been smiling.
#[derive(Debug, Parser)]
#[command(name = "smile", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Drive a live session from an event stream, ticking in real time.
    Run {
        /// Read events from this file instead of stdin.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print notifications as JSON lines.
        #[arg(long)]
        json: bool,
    },

    /// Replay a recorded event log in virtual time.
    Replay {
        /// Read events from this file instead of stdin.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print notifications as JSON lines.
        #[arg(long)]
        json: bool,

        /// Also print a duration line for every tick.
        #[arg(long)]
        ticks: bool,

        /// Keep ticking until this time (ISO 8601) after the last event.
        #[arg(long)]
        until: Option<DateTime<Utc>>,
    },

    /// Format a number of seconds as MM:SS.CC.
    Format {
        #[arg(allow_negative_numbers = true)]
        seconds: f64,
    },
}
