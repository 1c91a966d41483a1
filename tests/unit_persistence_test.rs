// tests/unit_persistence_test.rs

use opaldb::config::PersistenceConfig;
use opaldb::core::KeyValueStore;
use opaldb::core::persistence::{SnapshotLoader, save_snapshot};
use std::collections::HashMap;

fn config_for(path: &std::path::Path) -> PersistenceConfig {
    PersistenceConfig {
        snapshot_path: path.to_string_lossy().into_owned(),
    }
}

#[tokio::test]
async fn test_save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");

    let store = KeyValueStore::new();
    store.set("fruit", "apple");
    store.set("color", "green");
    save_snapshot(&store, path.to_str().unwrap()).await.unwrap();

    let reloaded = KeyValueStore::new();
    SnapshotLoader::new(config_for(&path))
        .load_into(&reloaded)
        .await;
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.get("fruit").as_deref(), Some("apple"));
}

#[tokio::test]
async fn test_snapshot_file_is_a_plain_json_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");

    let store = KeyValueStore::new();
    store.set("fruit", "apple");
    save_snapshot(&store, path.to_str().unwrap()).await.unwrap();

    let decoded: HashMap<String, String> =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(decoded, HashMap::from([("fruit".into(), "apple".into())]));

    // No temporary file is left behind after the rename.
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("db.json")]);
}

#[tokio::test]
async fn test_load_missing_file_yields_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nonexistent.json");

    let store = KeyValueStore::new();
    SnapshotLoader::new(config_for(&path)).load_into(&store).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_load_corrupt_file_yields_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    std::fs::write(&path, b"{\"fruit\": \"app").unwrap();

    let store = KeyValueStore::new();
    SnapshotLoader::new(config_for(&path)).load_into(&store).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_save_overwrites_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");

    let store = KeyValueStore::new();
    store.set("k", "v1");
    save_snapshot(&store, path.to_str().unwrap()).await.unwrap();
    store.set("k", "v2");
    save_snapshot(&store, path.to_str().unwrap()).await.unwrap();

    let reloaded = KeyValueStore::new();
    SnapshotLoader::new(config_for(&path))
        .load_into(&reloaded)
        .await;
    assert_eq!(reloaded.get("k").as_deref(), Some("v2"));
}
