//! Per-item install execution
//!
//! One catalog entry at a time: unwind the payload, classify it, place the
//! tree under the root matching its kind and leave an install record behind.
//! Callers isolate failures; nothing here aborts a whole pass.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::CatalogEntry;
use crate::error::{Result, SyncError};
use crate::fsops;
use crate::manifest::{self, Classification, ModKind};
use crate::record::{self, InstallRecord};
use crate::settings::Settings;
use crate::staging;

/// The two well-known local roots the engine installs into
#[derive(Debug, Clone)]
pub struct InstallRoots {
    /// Loader extensions live here and are always active
    pub extension_root: PathBuf,

    /// Regular mods live here, toggled via the enabled list
    pub mod_root: PathBuf,
}

impl InstallRoots {
    /// Root directory for a payload of the given kind
    pub fn dir_for(&self, kind: ModKind) -> &Path {
        match kind {
            ModKind::LoaderExtension => &self.extension_root,
            ModKind::Mod => &self.mod_root,
        }
    }
}

/// What a successful per-item execution did
#[derive(Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { unique_name: String, kind: ModKind },

    /// Payload is not a mod; nothing was changed
    Unrecognized,
}

/// Install or update one catalog entry from its materialized payload.
///
/// The destination directory is replaced wholesale, so no file from a
/// previous version survives an update. A fresh mod install is added to the
/// enabled list; an update leaves the list alone so a user's disable choice
/// survives. The staging tree is removed on every exit path.
pub fn install_entry(
    entry: &CatalogEntry,
    roots: &InstallRoots,
    settings: &mut Settings,
    is_update: bool,
) -> Result<InstallOutcome> {
    let payload = entry
        .payload_path
        .as_deref()
        .ok_or_else(|| SyncError::ExtractionFailed {
            archive: format!("item {}", entry.id),
            reason: "payload is not materialized".to_string(),
        })?;

    let staging = staging::unwind(payload)?;

    let (manifest, kind) = match manifest::classify(staging.path())? {
        Classification::Recognized { manifest, kind } => (manifest, kind),
        Classification::Unrecognized => {
            info!(id = %entry.id, "payload is not a recognized mod, skipping");
            return Ok(InstallOutcome::Unrecognized);
        }
    };

    info!(
        id = %entry.id,
        unique_name = %manifest.unique_name,
        display_name = %manifest.display_name,
        update = is_update,
        "installing mod"
    );

    let destination = roots.dir_for(kind).join(&manifest.unique_name);
    fsops::replace_tree(staging.path(), &destination)?;
    record::write(
        &destination,
        &InstallRecord {
            local_timestamp: entry.remote_timestamp,
            source_id: entry.id,
            unique_name: manifest.unique_name.clone(),
        },
    )?;

    if kind == ModKind::Mod && !is_update {
        settings.enable_mod(&manifest.unique_name);
    }

    Ok(InstallOutcome::Installed {
        unique_name: manifest.unique_name,
        kind,
    })
}
