//! Cro CLI - inspect and export Cronos database streams
//!
//! # Commands
//!
//! - `cro inspect <dir>` - Dump CroStru.dat and sample CroBank.dat records for
//!   working out a record layout by hand
//! - `cro export <dir> --schema schema.toml` - Decode CroBank.dat into CSV
//!
//! # Usage
//!
//! ```bash
//! # Look at the raw data, guessing 256-byte records
//! cro inspect ./db --guess-record-size 256
//!
//! # Export once the layout is known
//! cro export ./db --schema db.toml -o people.csv
//! ```
//!
//! Input files must already be decrypted.

mod delimited;
mod dump;
mod export;
mod input;
mod inspect;
mod schema;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;

/// Cro CLI - inspect and export Cronos database streams
#[derive(Parser)]
#[command(name = "cro")]
#[command(about = "Inspect and export Cronos structure and bank streams")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump structure and sample records to reverse engineer a schema
    Inspect(inspect::InspectArgs),

    /// Export CroBank.dat to delimited text using a schema
    Export(export::ExportArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(args) => inspect::execute(args),
        Commands::Export(args) => export::execute(args),
    }
}
