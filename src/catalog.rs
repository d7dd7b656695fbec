//! Remote subscription catalog
//!
//! The catalog is the engine's view of the remote subscription source: one
//! entry per subscribed item, rebuilt from scratch on every pass and never
//! persisted. The source itself is reached through the [`SubscriptionSource`]
//! capability; [`JsonCatalogSource`] is the file-backed implementation used
//! by the CLI and the integration tests.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SyncError};
use crate::record::InstallRecord;

/// Opaque stable identifier of a subscribed catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of one subscribed item as reported by the subscription source
#[derive(Debug, Clone)]
pub struct SourceItem {
    /// Payload location on disk; `None` until the download has materialized
    pub payload_path: Option<PathBuf>,

    /// Monotonically increasing remote revision marker
    pub timestamp: u64,

    /// Payload is currently being downloaded
    pub downloading: bool,
}

/// Capability the remote subscription collaborator exposes to the engine
pub trait SubscriptionSource {
    /// Enumerate all currently subscribed item ids
    fn subscribed_ids(&self) -> Result<Vec<ItemId>>;

    /// Fetch the state of a single subscribed item
    fn item(&self, id: ItemId) -> Result<SourceItem>;
}

/// One subscribed item plus what the local scan attached to it
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: ItemId,
    pub payload_path: Option<PathBuf>,
    pub remote_timestamp: u64,
    pub downloading: bool,

    /// Payload is materialized on disk and not currently downloading
    pub available: bool,

    /// Install record found for this item during the local scan
    pub installed: Option<InstallRecord>,
}

/// Build the in-memory catalog from the subscription source.
///
/// Id enumeration failure aborts the pass; a failed per-id fetch only skips
/// that item, which stays unsynchronized until the next pass.
pub fn build_catalog(source: &dyn SubscriptionSource) -> Result<HashMap<ItemId, CatalogEntry>> {
    let ids = source.subscribed_ids()?;
    debug!(subscribed = ids.len(), "building subscription catalog");

    let mut catalog = HashMap::new();
    for id in ids {
        let item = match source.item(id) {
            Ok(item) => item,
            Err(e) => {
                warn!(%id, error = %e, "failed to fetch subscribed item, skipping");
                continue;
            }
        };
        let available =
            !item.downloading && item.payload_path.as_deref().is_some_and(Path::exists);
        catalog.insert(
            id,
            CatalogEntry {
                id,
                payload_path: item.payload_path,
                remote_timestamp: item.timestamp,
                downloading: item.downloading,
                available,
                installed: None,
            },
        );
    }
    Ok(catalog)
}

/// A subscribed item as written in a catalog file
#[derive(Debug, Deserialize)]
struct CatalogFileItem {
    id: u64,

    /// Path to the materialized payload (archive file or directory)
    #[serde(default)]
    payload: Option<PathBuf>,

    timestamp: u64,

    #[serde(default)]
    downloading: bool,
}

/// File-backed subscription source: a JSON array of subscribed items.
///
/// Stands in for the live workshop client, which hands the engine the same
/// tuple per item: payload location, revision timestamp and download state.
pub struct JsonCatalogSource {
    items: Vec<CatalogFileItem>,
}

impl JsonCatalogSource {
    /// Load a catalog file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SyncError::CatalogNotFound {
                    path: path.display().to_string(),
                }
            } else {
                SyncError::FileReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        })?;
        let items = serde_json::from_str(&text).map_err(|e| SyncError::CatalogParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { items })
    }
}

impl SubscriptionSource for JsonCatalogSource {
    fn subscribed_ids(&self) -> Result<Vec<ItemId>> {
        Ok(self.items.iter().map(|i| ItemId(i.id)).collect())
    }

    fn item(&self, id: ItemId) -> Result<SourceItem> {
        self.items
            .iter()
            .find(|i| i.id == id.0)
            .map(|i| SourceItem {
                payload_path: i.payload.clone(),
                timestamp: i.timestamp,
                downloading: i.downloading,
            })
            .ok_or_else(|| SyncError::SourceUnavailable {
                reason: format!("item {} is not in the catalog file", id),
            })
    }
}
