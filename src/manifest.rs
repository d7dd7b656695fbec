//! Mod manifest and payload classification
//!
//! After a payload is unwound into a staging directory, the manifest at its
//! root declares the mod's identity and top-level marker files decide what
//! kind of payload it is. Payloads without a manifest or without a marker
//! are not handled by this engine at all (e.g. non-mod workshop uploads)
//! and are skipped without error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Manifest file expected at the root of an unwound payload
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Marker file identifying a loader extension payload
pub const LOADER_MARKER_FILE: &str = "loader_extension.json";

/// Marker file identifying a regular mod payload
pub const MOD_MARKER_FILE: &str = "package_settings.json";

/// Author-declared identity of a mod
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Unique across all installed mods; used as the install directory name
    pub unique_name: String,

    #[serde(default)]
    pub display_name: String,
}

/// Kind of an unwound payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModKind {
    /// Extends the mod loader itself; always active by virtue of location
    LoaderExtension,

    /// Regular mod, toggled through the enabled list in the settings
    Mod,
}

/// Outcome of classifying an unwound payload
#[derive(Debug)]
pub enum Classification {
    Recognized { manifest: Manifest, kind: ModKind },

    /// Not a payload this engine handles; skipped without error
    Unrecognized,
}

/// Read the manifest at the staging root and classify the payload.
///
/// A missing manifest and a manifest without any marker file are both
/// `Unrecognized`. An unparsable manifest and an empty or unusable unique
/// name are per-item failures: the payload should have been installable
/// but is malformed.
pub fn classify(staging_dir: &Path) -> Result<Classification> {
    let manifest_path = staging_dir.join(MANIFEST_FILE_NAME);
    let text = match std::fs::read_to_string(&manifest_path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Classification::Unrecognized);
        }
        Err(e) => {
            return Err(SyncError::FileReadFailed {
                path: manifest_path.display().to_string(),
                reason: e.to_string(),
            });
        }
    };

    let manifest: Manifest =
        serde_json::from_str(&text).map_err(|e| SyncError::ManifestParseFailed {
            path: manifest_path.display().to_string(),
            reason: e.to_string(),
        })?;
    validate_unique_name(&manifest)?;

    let kind = if staging_dir.join(LOADER_MARKER_FILE).is_file() {
        ModKind::LoaderExtension
    } else if staging_dir.join(MOD_MARKER_FILE).is_file() {
        ModKind::Mod
    } else {
        return Ok(Classification::Unrecognized);
    };

    Ok(Classification::Recognized { manifest, kind })
}

/// The unique name becomes an install directory component, so it crosses the
/// same trust boundary as archive entry paths.
fn validate_unique_name(manifest: &Manifest) -> Result<()> {
    let name = manifest.unique_name.as_str();
    if name.is_empty() {
        return Err(SyncError::EmptyUniqueName {
            display_name: manifest.display_name.clone(),
        });
    }
    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(SyncError::InvalidUniqueName {
            name: name.to_string(),
        });
    }
    Ok(())
}
