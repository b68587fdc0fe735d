//! Folio CLI - block tree export.
//!
//! Provides commands for:
//! - `export`: Render a page tree to a standalone HTML document
//! - `stats`: Count blocks per type
//! - `toc`: Print the heading outline

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExportArgs, StatsArgs, TocArgs};
use output::{Output, Tone};

/// Folio - fetch, cache and render block trees.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a page tree to HTML.
    Export(ExportArgs),
    /// Show block type counts of a page tree.
    Stats(StatsArgs),
    /// Show the heading outline of a page tree.
    Toc(TocArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Export(args) => args.tree.verbose,
            Self::Stats(args) => args.tree.verbose,
            Self::Toc(args) => args.tree.verbose,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Export(args) => args.execute(),
        Commands::Stats(args) => args.execute(),
        Commands::Toc(args) => args.execute(),
    };

    if let Err(err) = result {
        output.line(Tone::Failure, &format!("Error: {err}"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
