//! File tree operations shared by the installer and the reconciliation scan

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Result, SyncError};

fn write_error(path: &Path, e: std::io::Error) -> SyncError {
    SyncError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// Create a directory and all missing parents
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| write_error(path, e))
}

/// Recursively copy `source` into `target`, creating `target` if needed.
/// Files already present at the same relative path are overwritten.
pub fn copy_tree(source: &Path, target: &Path) -> Result<()> {
    ensure_dir(target)?;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|e| SyncError::IoError {
            message: e.to_string(),
        })?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| SyncError::IoError {
                message: e.to_string(),
            })?;
        let dest = target.join(rel);
        if entry.file_type().is_dir() {
            ensure_dir(&dest)?;
        } else {
            std::fs::copy(entry.path(), &dest)
                .map_err(|e| write_error(&dest, e))
                .map(|_| ())?;
        }
    }
    Ok(())
}

/// Replace `target` with the tree at `source`.
///
/// An existing target directory is deleted wholesale before copying, so no
/// file from a previous version survives the replacement.
pub fn replace_tree(source: &Path, target: &Path) -> Result<()> {
    if target.exists() {
        std::fs::remove_dir_all(target).map_err(|e| write_error(target, e))?;
    }
    copy_tree(source, target)
}
