//! End-to-end sync tests

mod common;

use common::{TestEnv, catalog_entry, make_zip};
use predicates::prelude::*;

#[test]
fn test_sync_installs_fresh_mod() {
    let env = TestEnv::new();
    let payload = env.mod_payload("FreshMod");
    let catalog = env.write_catalog(&[catalog_entry(100, &payload, 5)]);

    env.sync(&catalog)
        .success()
        .stdout(predicate::str::contains("installed FreshMod"));

    let installed = env.mods_root().join("FreshMod");
    assert!(installed.join("content.txt").is_file());

    let record = env.record(&env.mods_root(), "FreshMod");
    assert_eq!(record["local_timestamp"], 5);
    assert_eq!(record["source_id"], 100);
    assert_eq!(record["unique_name"], "FreshMod");

    let settings = env.settings();
    assert_eq!(settings["enabled_mods"][0], "FreshMod");
}

#[test]
fn test_sync_installs_loader_extension_without_enabling() {
    let env = TestEnv::new();
    let payload = env.extension_payload("SomeLoaderExt");
    let catalog = env.write_catalog(&[catalog_entry(200, &payload, 1)]);

    env.sync(&catalog).success();

    assert!(env.extensions_root().join("SomeLoaderExt").is_dir());
    assert_eq!(
        env.settings()["enabled_mods"].as_array().map(Vec::len),
        Some(0)
    );
}

#[test]
fn test_sync_installs_from_zip_payload() {
    let env = TestEnv::new();
    let payload_dir = env.temp.path().join("zipped-payload");
    std::fs::create_dir_all(&payload_dir).unwrap();
    make_zip(
        &payload_dir.join("upload.zip"),
        &[
            (
                "manifest.json",
                br#"{"unique_name": "ZippedMod", "display_name": "Zipped Mod"}"# as &[u8],
            ),
            ("package_settings.json", b"{}"),
            ("data/asset.txt", b"asset"),
        ],
    );
    let catalog = env.write_catalog(&[catalog_entry(300, &payload_dir, 2)]);

    env.sync(&catalog).success();

    let installed = env.mods_root().join("ZippedMod");
    assert_eq!(
        std::fs::read_to_string(installed.join("data/asset.txt")).unwrap(),
        "asset"
    );
}

#[test]
fn test_sync_installs_from_legacy_archive_file() {
    let env = TestEnv::new();
    let payload = env.temp.path().join("300123_legacy.bin");
    make_zip(
        &payload,
        &[
            (
                "manifest.json",
                br#"{"unique_name": "LegacyMod", "display_name": "Legacy Mod"}"# as &[u8],
            ),
            ("package_settings.json", b"{}"),
        ],
    );
    let catalog = env.write_catalog(&[catalog_entry(301, &payload, 8)]);

    env.sync(&catalog).success();

    assert!(env.mods_root().join("LegacyMod").is_dir());
    assert_eq!(env.record(&env.mods_root(), "LegacyMod")["local_timestamp"], 8);
}

#[test]
fn test_second_sync_reports_up_to_date() {
    let env = TestEnv::new();
    let payload = env.mod_payload("StableMod");
    let catalog = env.write_catalog(&[catalog_entry(400, &payload, 3)]);

    env.sync(&catalog).success();
    env.sync(&catalog)
        .success()
        .stdout(predicate::str::contains("1 up to date"))
        .stdout(predicate::str::contains("installed StableMod").not());
}

#[test]
fn test_newer_timestamp_triggers_update() {
    let env = TestEnv::new();
    let payload = env.mod_payload("GrowingMod");

    let catalog_v1 = env.write_catalog(&[catalog_entry(500, &payload, 1)]);
    env.sync(&catalog_v1).success();

    // A stale file from the old version must not survive the update
    std::fs::write(env.mods_root().join("GrowingMod/stale.txt"), "old").unwrap();

    let catalog_v2 = env.write_catalog(&[catalog_entry(500, &payload, 2)]);
    env.sync(&catalog_v2)
        .success()
        .stdout(predicate::str::contains("updated GrowingMod"));

    assert!(!env.mods_root().join("GrowingMod/stale.txt").exists());
    assert_eq!(env.record(&env.mods_root(), "GrowingMod")["local_timestamp"], 2);
}

#[test]
fn test_downloading_item_is_skipped() {
    let env = TestEnv::new();
    let payload = env.mod_payload("InFlight");
    let catalog = env.write_catalog(&[serde_json::json!({
        "id": 600,
        "payload": payload,
        "timestamp": 1,
        "downloading": true,
    })]);

    env.sync(&catalog)
        .success()
        .stdout(predicate::str::contains("1 skipped"));
    assert!(!env.mods_root().join("InFlight").exists());
}

#[test]
fn test_broken_item_does_not_stop_the_pass() {
    let env = TestEnv::new();
    let good1 = env.mod_payload("GoodOne");
    let good2 = env.mod_payload("GoodTwo");

    let broken = env.temp.path().join("payload-broken");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("manifest.json"), "{ definitely broken").unwrap();
    std::fs::write(broken.join("package_settings.json"), "{}").unwrap();

    let catalog = env.write_catalog(&[
        catalog_entry(1, &good1, 1),
        catalog_entry(2, &broken, 1),
        catalog_entry(3, &good2, 1),
    ]);

    env.sync(&catalog)
        .success()
        .stdout(predicate::str::contains("failed item 2"))
        .stdout(predicate::str::contains("1 failed"));

    assert!(env.mods_root().join("GoodOne").is_dir());
    assert!(env.mods_root().join("GoodTwo").is_dir());
}

#[test]
fn test_unrecognized_payload_is_not_an_error() {
    let env = TestEnv::new();
    let payload = env.temp.path().join("payload-portraits");
    std::fs::create_dir_all(&payload).unwrap();
    std::fs::write(payload.join("portrait.png"), "image bytes").unwrap();

    let catalog = env.write_catalog(&[catalog_entry(700, &payload, 1)]);

    env.sync(&catalog)
        .success()
        .stdout(predicate::str::contains("0 failed"))
        .stdout(predicate::str::contains("1 skipped"));
}

#[test]
fn test_nested_archive_payload_unwinds() {
    let env = TestEnv::new();

    // The pipeline re-zipped the upload: mod.zip inside upload.zip
    let build = env.temp.path().join("build");
    std::fs::create_dir_all(&build).unwrap();
    make_zip(
        &build.join("mod.zip"),
        &[
            (
                "manifest.json",
                br#"{"unique_name": "NestedMod", "display_name": "Nested Mod"}"# as &[u8],
            ),
            ("package_settings.json", b"{}"),
        ],
    );
    let inner = std::fs::read(build.join("mod.zip")).unwrap();
    let payload_dir = env.temp.path().join("nested-payload");
    std::fs::create_dir_all(&payload_dir).unwrap();
    make_zip(&payload_dir.join("upload.zip"), &[("mod.zip", inner.as_slice())]);

    let catalog = env.write_catalog(&[catalog_entry(800, &payload_dir, 1)]);

    env.sync(&catalog).success();
    assert!(env.mods_root().join("NestedMod").is_dir());
}
