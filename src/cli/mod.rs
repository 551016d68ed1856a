//! Command-line interface for anitrack.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// anitrack - anime catalog and watch tracking service
#[derive(Parser)]
#[command(name = "anitrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config.toml; defaults to the standard search locations
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Apply database migrations and exit
    Migrate,

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        #[arg(default_value = "config.toml")]
        path: PathBuf,
    },
}
