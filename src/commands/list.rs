//! List command implementation
//!
//! Shows what occupies the two mod roots: managed directories with their
//! install records, plus anything unmanaged that a future pass would remove.

use std::path::{Path, PathBuf};

use console::Style;

use crate::cli::ListArgs;
use crate::error::Result;
use crate::record::{self, RecordStatus};
use crate::settings::Settings;
use crate::sync::SyncConfig;

/// Run list command
pub fn run(data_dir: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let config = SyncConfig::under_data_dir(&super::resolve_data_dir(data_dir));

    // Read-only peek at the settings; listing must not recreate the file
    let settings: Settings = std::fs::read_to_string(&config.settings_path)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_default();

    let mut total = 0;
    total += list_root(
        "Loader extensions",
        &config.roots.extension_root,
        None,
        args.detailed,
    );
    total += list_root("Mods", &config.roots.mod_root, Some(&settings), args.detailed);

    if total == 0 {
        println!("No mods installed.");
    }
    Ok(())
}

/// List one root; returns the number of directories found
fn list_root(title: &str, root: &Path, settings: Option<&Settings>, detailed: bool) -> usize {
    let Ok(entries) = std::fs::read_dir(root) else {
        return 0;
    };

    let mut directories: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    directories.sort();

    if directories.is_empty() {
        return 0;
    }

    println!("{}:", Style::new().bold().apply_to(title));
    for dir in &directories {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match record::read(dir) {
            RecordStatus::Found(rec) => {
                let state = settings.map(|s| {
                    if s.enabled_mods.iter().any(|m| m == &rec.unique_name) {
                        Style::new().green().apply_to("enabled")
                    } else {
                        Style::new().dim().apply_to("disabled")
                    }
                });
                match state {
                    Some(state) => println!(
                        "  {} ({})",
                        Style::new().bold().yellow().apply_to(&rec.unique_name),
                        state
                    ),
                    None => println!(
                        "  {}",
                        Style::new().bold().yellow().apply_to(&rec.unique_name)
                    ),
                }
                if detailed {
                    println!("    {} {}", Style::new().bold().apply_to("Item:"), rec.source_id);
                    println!(
                        "    {} {}",
                        Style::new().bold().apply_to("Revision:"),
                        rec.local_timestamp
                    );
                    println!("    {} {}", Style::new().bold().apply_to("Path:"), dir.display());
                }
            }
            RecordStatus::Missing | RecordStatus::Corrupt { .. } => {
                println!(
                    "  {} {}",
                    Style::new().dim().apply_to(&name),
                    Style::new().red().apply_to("(unmanaged, will be removed on next sync)")
                );
            }
        }
    }
    println!();
    directories.len()
}
