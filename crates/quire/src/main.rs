//! Quire CLI - documentation site builder.
//!
//! Provides commands for:
//! - `build`: Render content into chunks and a page manifest
//! - `check`: Build into a scratch directory and load every page
//! - `routes`: Print the sidebar or nav bar in reading order
//! - `serve`: Build and start the preview server

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, RoutesArgs, ServeArgs};
use error::CliError;
use output::Output;

/// Quire - documentation site builder.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site.
    Build(BuildArgs),
    /// Build into a scratch directory and load every page.
    Check(CheckArgs),
    /// Print navigation routes in reading order.
    Routes(RoutesArgs),
    /// Build the site and start the preview server.
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Routes(args) => args.execute(),
        Commands::Check(args) => block_on(args.execute()),
        Commands::Serve(args) => block_on(args.execute()),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn block_on(task: impl Future<Output = Result<(), CliError>>) -> Result<(), CliError> {
    tokio::runtime::Runtime::new()?.block_on(task)
}
