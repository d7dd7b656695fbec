//! Process-wide settings store
//!
//! One JSON file per installation: the list of enabled mods plus any extra
//! source directories configured for the host process. The file is loaded
//! once at the start of a pass and persisted once at the end. A missing or
//! corrupt file is recreated with defaults; corruption is never propagated
//! to the caller.

use std::io::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SyncError};

/// Process-wide configuration persisted between passes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Extra scan roots for the host process; persisted here, not scanned by
    /// the engine itself
    #[serde(default)]
    pub source_directories: Vec<String>,

    /// Unique names of enabled mods. Loader extensions are always active by
    /// virtue of location and are never listed here.
    #[serde(default)]
    pub enabled_mods: Vec<String>,
}

impl Settings {
    /// Load settings, recreating the file with defaults when it is missing
    /// or corrupt. Fails only if the recreated file cannot be written.
    pub fn load_or_recreate(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => return Ok(settings),
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "settings file is corrupt, recreating with defaults"
                ),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "settings file missing, creating with defaults");
            }
            Err(e) => warn!(
                path = %path.display(),
                error = %e,
                "settings file unreadable, recreating with defaults"
            ),
        }

        let defaults = Settings::default();
        defaults.save(path)?;
        Ok(defaults)
    }

    /// Persist settings as pretty-printed JSON.
    ///
    /// Writes a temporary file in the same directory and renames it into
    /// place, so a crash never leaves a half-written settings file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_error = |reason: String| SyncError::SettingsWriteFailed {
            path: path.display().to_string(),
            reason,
        };

        let json = serde_json::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| write_error(e.to_string()))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| write_error(e.to_string()))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| write_error(e.to_string()))?;
        tmp.persist(path).map_err(|e| write_error(e.to_string()))?;
        Ok(())
    }

    /// Add a mod to the enabled list if it is not already present.
    /// Returns true if the list changed.
    pub fn enable_mod(&mut self, unique_name: &str) -> bool {
        if self.enabled_mods.iter().any(|m| m == unique_name) {
            return false;
        }
        self.enabled_mods.push(unique_name.to_string());
        true
    }

    /// Remove a mod from the enabled list. Returns true if it was present.
    pub fn remove_mod(&mut self, unique_name: &str) -> bool {
        let before = self.enabled_mods.len();
        self.enabled_mods.retain(|m| m != unique_name);
        self.enabled_mods.len() != before
    }
}
