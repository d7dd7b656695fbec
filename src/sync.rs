//! Reconciliation engine
//!
//! One pass: build the catalog from the subscription source, scan the two
//! local roots for install records, remove orphaned directories, then
//! install or update every available item whose local revision is behind,
//! and persist the settings once at the end. A per-item failure never
//! aborts the pass; the item stays unsynchronized, its local revision
//! unchanged, and is retried on the next pass.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::catalog::{self, CatalogEntry, ItemId, SubscriptionSource};
use crate::error::Result;
use crate::fsops;
use crate::installer::{self, InstallOutcome, InstallRoots};
use crate::manifest::ModKind;
use crate::record::{self, RecordStatus};
use crate::settings::Settings;

/// Filesystem layout one engine instance operates on
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub roots: InstallRoots,
    pub settings_path: PathBuf,
}

impl SyncConfig {
    /// Conventional layout under a single data directory
    pub fn under_data_dir(data_dir: &Path) -> Self {
        Self {
            roots: InstallRoots {
                extension_root: data_dir.join("extensions"),
                mod_root: data_dir.join("mods"),
            },
            settings_path: data_dir.join("settings.json"),
        }
    }
}

/// What one reconciliation pass did
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Unique names installed for the first time
    pub installed: Vec<String>,

    /// Unique names updated in place
    pub updated: Vec<String>,

    /// Directory names of removed orphans
    pub removed: Vec<String>,

    /// Items already at the remote revision
    pub unchanged: usize,

    /// Items skipped without error (downloading, unmaterialized, unrecognized)
    pub skipped: usize,

    /// Per-item failures; these items are retried next pass
    pub failures: Vec<ItemFailure>,
}

/// One catalog item that could not be installed this pass
#[derive(Debug)]
pub struct ItemFailure {
    pub id: ItemId,
    pub reason: String,
}

/// A directory marked for removal during the local scan
struct Orphan {
    path: PathBuf,
    unique_name: Option<String>,
    kind: ModKind,
}

/// The synchronization engine. Constructed once at process start and handed
/// to whatever invokes it; there is no ambient global instance.
pub struct Synchronizer<S> {
    config: SyncConfig,
    source: S,
    started: bool,
}

impl<S: SubscriptionSource> Synchronizer<S> {
    pub fn new(config: SyncConfig, source: S) -> Self {
        Self {
            config,
            source,
            started: false,
        }
    }

    /// Latch for the host process bootstrap, which cannot guarantee it calls
    /// the engine exactly once: the first call runs a pass, every later call
    /// is a no-op returning `None`.
    pub fn start(&mut self) -> Result<Option<SyncReport>> {
        if self.started {
            debug!("synchronization already started, ignoring");
            return Ok(None);
        }
        self.started = true;
        self.synchronize().map(Some)
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Run one full reconciliation pass.
    ///
    /// Fails only for the engine's own invariants: the settings store being
    /// unusable or the subscribed id list being unavailable.
    pub fn synchronize(&mut self) -> Result<SyncReport> {
        info!("starting synchronization pass");
        fsops::ensure_dir(&self.config.roots.extension_root)?;
        fsops::ensure_dir(&self.config.roots.mod_root)?;

        let mut settings = Settings::load_or_recreate(&self.config.settings_path)?;
        let mut catalog = catalog::build_catalog(&self.source)?;
        let mut report = SyncReport::default();

        let orphans = self.scan_roots(&mut catalog);
        self.remove_orphans(orphans, &mut settings, &mut report);
        self.reconcile_entries(&catalog, &mut settings, &mut report);

        settings.save(&self.config.settings_path)?;
        info!(
            installed = report.installed.len(),
            updated = report.updated.len(),
            removed = report.removed.len(),
            unchanged = report.unchanged,
            skipped = report.skipped,
            failures = report.failures.len(),
            "synchronization pass finished"
        );
        Ok(report)
    }

    /// Scan both roots, attaching each valid record to its catalog entry.
    ///
    /// Directories whose record points at an unsubscribed item, and
    /// directories without a valid record at all, are marked as orphans.
    fn scan_roots(&self, catalog: &mut HashMap<ItemId, CatalogEntry>) -> Vec<Orphan> {
        let mut orphans = Vec::new();
        let roots = [
            (&self.config.roots.extension_root, ModKind::LoaderExtension),
            (&self.config.roots.mod_root, ModKind::Mod),
        ];
        for (root, kind) in roots {
            let entries = match std::fs::read_dir(root) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "cannot scan root");
                    continue;
                }
            };
            for dir_entry in entries.flatten() {
                let path = dir_entry.path();
                if !path.is_dir() {
                    continue;
                }
                match record::read(&path) {
                    RecordStatus::Found(rec) => match catalog.get_mut(&rec.source_id) {
                        Some(entry) => {
                            debug!(
                                unique_name = %rec.unique_name,
                                id = %rec.source_id,
                                "found installed mod"
                            );
                            entry.installed = Some(rec);
                        }
                        None => orphans.push(Orphan {
                            path,
                            unique_name: Some(rec.unique_name),
                            kind,
                        }),
                    },
                    RecordStatus::Missing => orphans.push(Orphan {
                        path,
                        unique_name: None,
                        kind,
                    }),
                    RecordStatus::Corrupt { reason } => {
                        warn!(path = %path.display(), reason = %reason, "install record is corrupt");
                        orphans.push(Orphan {
                            path,
                            unique_name: None,
                            kind,
                        });
                    }
                }
            }
        }
        orphans
    }

    /// Delete orphaned directories. Removal failures are logged and never
    /// abort the pass. Runs to completion before any install starts, since
    /// an install may reuse a directory name just vacated here.
    fn remove_orphans(
        &self,
        orphans: Vec<Orphan>,
        settings: &mut Settings,
        report: &mut SyncReport,
    ) {
        for orphan in orphans {
            let name = orphan.unique_name.clone().unwrap_or_else(|| {
                orphan
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            info!(path = %orphan.path.display(), unique_name = %name, "removing unsubscribed mod");
            if let Err(e) = std::fs::remove_dir_all(&orphan.path) {
                warn!(path = %orphan.path.display(), error = %e, "failed to remove orphan");
                continue;
            }
            if orphan.kind == ModKind::Mod {
                settings.remove_mod(&name);
            }
            report.removed.push(name);
        }
    }

    /// Walk the catalog and install or update whatever is behind.
    fn reconcile_entries(
        &self,
        catalog: &HashMap<ItemId, CatalogEntry>,
        settings: &mut Settings,
        report: &mut SyncReport,
    ) {
        for entry in catalog.values() {
            if entry.downloading {
                debug!(id = %entry.id, "still downloading, skipping");
                report.skipped += 1;
                continue;
            }
            if !entry.available {
                debug!(id = %entry.id, "payload not materialized, skipping");
                report.skipped += 1;
                continue;
            }
            let is_update = match &entry.installed {
                None => false,
                Some(rec) if rec.local_timestamp < entry.remote_timestamp => true,
                Some(_) => {
                    report.unchanged += 1;
                    continue;
                }
            };
            match installer::install_entry(entry, &self.config.roots, settings, is_update) {
                Ok(InstallOutcome::Installed { unique_name, .. }) => {
                    if is_update {
                        report.updated.push(unique_name);
                    } else {
                        report.installed.push(unique_name);
                    }
                }
                Ok(InstallOutcome::Unrecognized) => report.skipped += 1,
                Err(e) => {
                    error!(id = %entry.id, error = %e, "failed to install item");
                    report.failures.push(ItemFailure {
                        id: entry.id,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}
