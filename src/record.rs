//! Install record store
//!
//! Each installed mod directory carries exactly one record file naming the
//! catalog item it was installed from and the revision that was installed.
//! The reconciliation scan reads these to detect staleness and ownership; a
//! directory without a valid record is never trusted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::ItemId;
use crate::error::{Result, SyncError};

/// File name of the install record inside an installed mod directory
pub const RECORD_FILE_NAME: &str = "workshop_record.json";

/// Persisted proof that a managed mod occupies a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRecord {
    /// Remote revision last installed into this directory
    pub local_timestamp: u64,

    /// Catalog item this directory was installed from
    pub source_id: ItemId,

    /// Mod identity; also the directory name
    pub unique_name: String,
}

/// Outcome of reading the record of one installed directory
#[derive(Debug)]
pub enum RecordStatus {
    Found(InstallRecord),
    Missing,
    Corrupt { reason: String },
}

/// Read the install record colocated with an installed directory.
///
/// Never fails: an unreadable or unparsable record is reported as `Corrupt`
/// and the caller decides what to do with the directory.
pub fn read(directory: &Path) -> RecordStatus {
    let path = directory.join(RECORD_FILE_NAME);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return RecordStatus::Missing,
        Err(e) => {
            return RecordStatus::Corrupt {
                reason: e.to_string(),
            };
        }
    };
    match serde_json::from_str(&text) {
        Ok(record) => RecordStatus::Found(record),
        Err(e) => RecordStatus::Corrupt {
            reason: e.to_string(),
        },
    }
}

/// Write the install record, fully replacing any prior content
pub fn write(directory: &Path, record: &InstallRecord) -> Result<()> {
    let path = directory.join(RECORD_FILE_NAME);
    let json =
        serde_json::to_string_pretty(record).map_err(|e| SyncError::RecordWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    std::fs::write(&path, json).map_err(|e| SyncError::RecordWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
