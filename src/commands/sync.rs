//! Sync command implementation
//!
//! Runs one reconciliation pass against a catalog file and prints what the
//! pass did. Per-item failures are reported but do not fail the command;
//! those items are retried on the next pass.

use std::path::PathBuf;

use console::Style;

use crate::catalog::JsonCatalogSource;
use crate::cli::SyncArgs;
use crate::error::Result;
use crate::sync::{SyncConfig, SyncReport, Synchronizer};

/// Run sync command
pub fn run(data_dir: Option<PathBuf>, args: SyncArgs) -> Result<()> {
    let config = SyncConfig::under_data_dir(&super::resolve_data_dir(data_dir));
    let source = JsonCatalogSource::load(&args.catalog)?;

    let mut synchronizer = Synchronizer::new(config, source);
    let report = synchronizer.synchronize()?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &SyncReport) {
    for name in &report.installed {
        println!("  {} {}", Style::new().green().apply_to("installed"), name);
    }
    for name in &report.updated {
        println!("  {} {}", Style::new().cyan().apply_to("updated"), name);
    }
    for name in &report.removed {
        println!("  {} {}", Style::new().yellow().apply_to("removed"), name);
    }
    for failure in &report.failures {
        println!(
            "  {} item {}: {}",
            Style::new().red().apply_to("failed"),
            failure.id,
            failure.reason
        );
    }

    println!(
        "{} {} installed, {} updated, {} removed, {} up to date, {} skipped, {} failed",
        Style::new().bold().apply_to("Sync finished:"),
        report.installed.len(),
        report.updated.len(),
        report.removed.len(),
        report.unchanged,
        report.skipped,
        report.failures.len()
    );
}
