//! Roster CLI - Database migrations and offline tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! roster-cli migrate
//!
//! # Show what uploading a PDF would create, without touching the database
//! roster-cli ingest staff-list.pdf
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `ingest` - Dry-run PDF ingestion and print the result as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "roster-cli")]
#[command(author, version, about = "Roster CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Parse a PDF the way the upload endpoint does and print the outcome
    Ingest {
        /// Path to the PDF
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Ingest { path } => commands::ingest::run(path).await?,
    }
    Ok(())
}
