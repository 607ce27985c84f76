//! Pageway CLI - sitemap routing inspector.
//!
//! Provides commands for:
//! - `routes`: Print the flattened routing table
//! - `resolve`: Dispatch a path and print the render instruction
//! - `nav`: Print the navigation menu

mod commands;
mod error;
mod output;
mod router;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{NavArgs, ResolveArgs, RoutesArgs};
use output::Output;

/// Pageway - sitemap routing inspector.
#[derive(Parser)]
#[command(name = "pw", version, about)]
struct Cli {
    /// Enable verbose output (info level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the flattened routing table.
    Routes(RoutesArgs),
    /// Dispatch a path and print the render instruction.
    Resolve(ResolveArgs),
    /// Print the navigation menu.
    Nav(NavArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Routes(args) => args.execute(),
        Commands::Resolve(args) => args.execute(),
        Commands::Nav(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
