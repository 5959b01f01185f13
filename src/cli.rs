//! Command-line interface for lab_apis.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lab APIs - guessing game, calculator and employee directory
#[derive(Parser, Debug)]
#[command(name = "lab_apis")]
#[command(about = "Guessing game, calculator and employee HTTP APIs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// TOML config file; flags below override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Employee database file, or ":memory:"
        #[arg(long)]
        db_path: Option<String>,

        /// Insert sample employees into an empty store
        #[arg(long)]
        seed: bool,

        /// New games default to four distinct digits
        #[arg(long)]
        no_repeats: bool,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "lab_apis.db")]
        db_path: String,
    },
}
