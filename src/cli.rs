//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// modsync - workshop subscription synchronizer
#[derive(Parser, Debug)]
#[command(
    name = "modsync",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Keep locally installed mods in sync with a workshop subscription catalog",
    long_about = "modsync reconciles the mods installed under the local mod roots with a \
                  workshop subscription catalog: new subscriptions are installed, stale ones \
                  are updated in place and directories for unsubscribed items are removed.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  modsync sync --catalog subscriptions.json\n    \
                  modsync sync --catalog subscriptions.json --data-dir ./game-data\n    \
                  modsync list\n    \
                  modsync list --detailed"
)]
pub struct Cli {
    /// Data directory holding the mod roots and the settings file
    /// (defaults to the platform data directory)
    #[arg(long, short = 'd', global = true, env = "MODSYNC_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one synchronization pass against a subscription catalog
    Sync(SyncArgs),

    /// List installed mods and loader extensions
    List(ListArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the sync command
#[derive(Parser, Debug)]
pub struct SyncArgs {
    /// Subscription catalog file: a JSON array of
    /// {"id", "payload", "timestamp", "downloading"} items
    #[arg(long, short = 'c')]
    pub catalog: PathBuf,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show install record details
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
