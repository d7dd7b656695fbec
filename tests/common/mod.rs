//! Common test utilities for modsync integration tests

use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A throwaway environment: a data directory for the binary to operate on
/// and a scratch area for payloads and catalog files
pub struct TestEnv {
    /// Temporary directory backing the whole environment
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Data directory handed to the binary
    pub data_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let data_dir = temp.path().join("data");
        Self { temp, data_dir }
    }

    /// Command for the modsync binary pointed at this environment
    pub fn modsync(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("modsync").expect("binary should exist");
        cmd.env("MODSYNC_DATA_DIR", &self.data_dir);
        cmd
    }

    /// Run one sync pass against the given catalog file, asserting success
    #[allow(dead_code)]
    pub fn sync(&self, catalog: &Path) -> assert_cmd::assert::Assert {
        self.modsync()
            .args(["sync", "--catalog"])
            .arg(catalog)
            .assert()
    }

    /// Lay out a loose-directory payload for a regular mod
    #[allow(dead_code)]
    pub fn mod_payload(&self, unique_name: &str) -> PathBuf {
        self.payload_with_marker(unique_name, "package_settings.json")
    }

    /// Lay out a loose-directory payload for a loader extension
    #[allow(dead_code)]
    pub fn extension_payload(&self, unique_name: &str) -> PathBuf {
        self.payload_with_marker(unique_name, "loader_extension.json")
    }

    fn payload_with_marker(&self, unique_name: &str, marker: &str) -> PathBuf {
        let dir = self.temp.path().join(format!("payload-{}", unique_name));
        std::fs::create_dir_all(&dir).expect("Failed to create payload directory");
        std::fs::write(
            dir.join("manifest.json"),
            serde_json::json!({
                "unique_name": unique_name,
                "display_name": format!("{} (display)", unique_name),
            })
            .to_string(),
        )
        .expect("Failed to write manifest");
        std::fs::write(dir.join(marker), "{}").expect("Failed to write marker");
        std::fs::write(dir.join("content.txt"), format!("content of {}", unique_name))
            .expect("Failed to write content");
        dir
    }

    /// Write a catalog file listing the given entries
    pub fn write_catalog(&self, entries: &[serde_json::Value]) -> PathBuf {
        let path = self.temp.path().join("catalog.json");
        std::fs::write(&path, serde_json::Value::Array(entries.to_vec()).to_string())
            .expect("Failed to write catalog");
        path
    }

    pub fn mods_root(&self) -> PathBuf {
        self.data_dir.join("mods")
    }

    #[allow(dead_code)]
    pub fn extensions_root(&self) -> PathBuf {
        self.data_dir.join("extensions")
    }

    /// Parse the persisted settings file
    #[allow(dead_code)]
    pub fn settings(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(self.data_dir.join("settings.json"))
            .expect("Failed to read settings");
        serde_json::from_str(&text).expect("Settings should be valid JSON")
    }

    /// Parse the install record of an installed mod
    #[allow(dead_code)]
    pub fn record(&self, root: &Path, unique_name: &str) -> serde_json::Value {
        let text = std::fs::read_to_string(root.join(unique_name).join("workshop_record.json"))
            .expect("Failed to read install record");
        serde_json::from_str(&text).expect("Record should be valid JSON")
    }
}

/// A catalog entry for an available, materialized payload
pub fn catalog_entry(id: u64, payload: &Path, timestamp: u64) -> serde_json::Value {
    serde_json::json!({ "id": id, "payload": payload, "timestamp": timestamp })
}

/// Build a zip archive from (name, bytes) entries
#[allow(dead_code)]
pub fn make_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).expect("Failed to create zip file");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, data) in entries {
        writer.start_file(*name, options).expect("Failed to start zip entry");
        writer.write_all(data).expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip");
}
