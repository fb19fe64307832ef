//! Command-line interface for whodat.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Who Dat Dev - terminal client for the guessing game service
#[derive(Parser, Debug)]
#[command(name = "whodat")]
#[command(about = "Play the Who Dat Dev guessing game from your terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play the game, resuming any stored session
    Play {
        /// Game service URL
        #[arg(long)]
        server_url: Option<String>,

        /// Path to the session database (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,

        /// Path to a config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep the session in memory only, nothing written to disk
        #[arg(long)]
        ephemeral: bool,

        /// File to write logs to while the TUI owns the terminal
        #[arg(long, default_value = "whodat_tui.log")]
        log_file: PathBuf,
    },

    /// Show the stored session, if any
    Status {
        /// Path to the session database
        #[arg(long)]
        db_path: Option<String>,

        /// Path to a config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Clear the stored session
    Reset {
        /// Path to the session database
        #[arg(long)]
        db_path: Option<String>,

        /// Path to a config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check that the game service is reachable
    Ping {
        /// Game service URL
        #[arg(long)]
        server_url: Option<String>,

        /// Path to a config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
