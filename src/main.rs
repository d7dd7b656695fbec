//! modsync - workshop subscription synchronizer
//!
//! Reconciles the mods installed under two local roots (loader extensions
//! and regular mods) with a workshop subscription catalog: new subscriptions
//! are installed from their downloaded payloads, stale installations are
//! updated in place and directories for unsubscribed items are removed.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod commands;
mod error;
mod fsops;
mod installer;
mod manifest;
mod record;
mod settings;
mod staging;
mod sync;
mod temp;

use cli::{Cli, Commands};

/// Route engine diagnostics to stderr, filtered by RUST_LOG.
/// Defaults to warnings only so command output stays readable.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync(args) => commands::sync::run(cli.data_dir, args),
        Commands::List(args) => commands::list::run(cli.data_dir, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
