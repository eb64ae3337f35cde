//! ditapub CLI - publish DITA XHTML output to Confluence.
//!
//! Provides commands for:
//! - `publish`: Upload a TOC and its topics as a page tree
//! - `outline`: Print the page tree a TOC describes

mod commands;
mod error;
mod output;
mod prompt;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{OutlineArgs, PublishArgs};
use output::Output;

/// ditapub - publish DITA XHTML output to Confluence.
#[derive(Parser)]
#[command(name = "ditapub", version, about)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a TOC and its topics below a root page.
    Publish(PublishArgs),
    /// Print the page tree of a TOC without contacting Confluence.
    Outline(OutlineArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to INFO
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Publish(args) => args.execute(),
        Commands::Outline(args) => args.execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::from(err.exit_code())
        }
    }
}
