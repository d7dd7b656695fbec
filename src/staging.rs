//! Archive unwinder
//!
//! Payloads arrive in three shapes: a single legacy flat archive file, a
//! directory containing one or more archives, or a loose directory tree.
//! [`unwind`] resolves all of them into one flat staging tree, transparently
//! unpacking payloads that were re-zipped by the distribution pipeline, up
//! to a fixed nesting bound.

use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::{Result, SyncError};
use crate::fsops;
use crate::temp::temp_dir_base;

/// Suffix of legacy flat-binary payload archives (zip content despite the name)
pub const LEGACY_ARCHIVE_SUFFIX: &str = "_legacy.bin";

/// Extension of regular payload archives
const ARCHIVE_EXTENSION: &str = "zip";

/// Nested single-archive layers tolerated before the payload is rejected
pub const MAX_NESTED_ARCHIVES: u32 = 3;

/// A staged payload tree. Owns its directory; dropping it removes the tree.
pub struct Staging {
    dir: TempDir,
}

impl Staging {
    /// Root of the staged tree
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Unwind a payload location into a flat staging directory.
///
/// Resolution order: a file named `*_legacy.bin` (or a lone archive file) is
/// extracted directly; a directory containing archives has its first archive
/// in file-name order extracted; any other directory is copied verbatim.
/// Afterwards, as long as the staging tree consists of exactly one archive
/// file, that archive is unwrapped in place, bounded by
/// [`MAX_NESTED_ARCHIVES`]. Mods are allowed to ship zip files of their own;
/// unwrapping stops as soon as anything else sits next to the archive.
///
/// Intermediate staging areas are removed on every exit path. The returned
/// [`Staging`] owns the final tree and removes it on drop.
pub fn unwind(payload: &Path) -> Result<Staging> {
    let staging = TempDir::new_in(temp_dir_base())?;

    match resolve_archive(payload)? {
        Some(archive) => extract_archive(&archive, staging.path())?,
        None => fsops::copy_tree(payload, staging.path())?,
    }

    let mut depth = 0u32;
    while let Some(nested) = sole_nested_archive(staging.path())? {
        depth += 1;
        if depth > MAX_NESTED_ARCHIVES {
            return Err(SyncError::NestingExceeded {
                limit: MAX_NESTED_ARCHIVES,
            });
        }
        debug!(depth, archive = %nested.display(), "unwrapping nested archive");

        let inner = TempDir::new_in(temp_dir_base())?;
        extract_archive(&nested, inner.path())?;
        std::fs::remove_file(&nested)?;
        fsops::copy_tree(inner.path(), staging.path())?;
    }

    Ok(Staging { dir: staging })
}

/// Decide which archive, if any, the payload location holds.
///
/// For directories holding several archives the first in lexicographic
/// file-name order wins, so repeated passes over the same payload always
/// pick the same one.
fn resolve_archive(payload: &Path) -> Result<Option<PathBuf>> {
    if payload.is_file() {
        let name = payload.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.ends_with(LEGACY_ARCHIVE_SUFFIX) || is_archive_file(payload) {
            return Ok(Some(payload.to_path_buf()));
        }
        return Err(SyncError::ExtractionFailed {
            archive: payload.display().to_string(),
            reason: "payload file is neither an archive nor a directory tree".to_string(),
        });
    }
    if !payload.is_dir() {
        return Err(SyncError::ExtractionFailed {
            archive: payload.display().to_string(),
            reason: "payload location does not exist".to_string(),
        });
    }

    let mut archives: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(payload)? {
        let path = entry?.path();
        if path.is_file() && is_archive_file(&path) {
            archives.push(path);
        }
    }
    archives.sort();
    Ok(archives.into_iter().next())
}

fn is_archive_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

/// The single archive file making up the entire staging tree, if that is
/// what the tree currently looks like
fn sole_nested_archive(dir: &Path) -> Result<Option<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)?;
    let first = match entries.next() {
        Some(entry) => entry?,
        None => return Ok(None),
    };
    if entries.next().is_some() {
        return Ok(None);
    }
    let path = first.path();
    if path.is_file() && is_archive_file(&path) {
        Ok(Some(path))
    } else {
        Ok(None)
    }
}

/// Extract a zip archive into `dest`, rejecting entries whose resolved path
/// would land outside it
fn extract_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    let extraction_error = |reason: String| SyncError::ExtractionFailed {
        archive: archive_path.display().to_string(),
        reason,
    };

    debug!(archive = %archive_path.display(), "extracting archive");
    let file = File::open(archive_path).map_err(|e| extraction_error(e.to_string()))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| extraction_error(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| extraction_error(e.to_string()))?;
        let Some(rel) = entry.enclosed_name().map(Path::to_path_buf) else {
            return Err(SyncError::UnsafeArchivePath {
                entry: entry.name().to_string(),
            });
        };
        let out_path = dest.join(rel);
        if entry.is_dir() {
            fsops::ensure_dir(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fsops::ensure_dir(parent)?;
            }
            let mut out = File::create(&out_path).map_err(|e| extraction_error(e.to_string()))?;
            std::io::copy(&mut entry, &mut out).map_err(|e| extraction_error(e.to_string()))?;
        }
    }
    Ok(())
}
