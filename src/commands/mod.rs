//! Command implementations for the CLI

use std::path::PathBuf;

pub mod completions;
pub mod list;
pub mod sync;
pub mod version;

/// Resolve the data directory from the CLI argument or the platform default
pub(crate) fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("modsync")
    })
}
