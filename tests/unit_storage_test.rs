// tests/unit_storage_test.rs

use opaldb::core::KeyValueStore;
use std::sync::Arc;

#[test]
fn test_set_overwrites() {
    let store = KeyValueStore::new();
    store.set("k", "v1");
    store.set("k", "v2");
    assert_eq!(store.get("k").as_deref(), Some("v2"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_get_absent_key() {
    let store = KeyValueStore::new();
    assert_eq!(store.get("missing"), None);
}

#[test]
fn test_delete_absent_key_is_a_noop() {
    let store = KeyValueStore::new();
    store.set("k", "v");
    store.delete("other");
    assert_eq!(store.len(), 1);
    store.delete("k");
    store.delete("k");
    assert!(store.is_empty());
}

#[test]
fn test_snapshot_restore_round_trip() {
    let store = KeyValueStore::new();
    store.set("fruit", "apple");
    store.set("color", "green");
    store.set("empty", "");

    let bytes = store.snapshot().unwrap();

    let restored = KeyValueStore::new();
    restored.restore(&bytes).unwrap();
    assert_eq!(restored.len(), 3);
    assert_eq!(restored.get("fruit").as_deref(), Some("apple"));
    assert_eq!(restored.get("color").as_deref(), Some("green"));
    assert_eq!(restored.get("empty").as_deref(), Some(""));
}

#[test]
fn test_restore_replaces_previous_content() {
    let store = KeyValueStore::new();
    store.set("old", "value");

    let other = KeyValueStore::new();
    other.set("new", "value");
    store.restore(&other.snapshot().unwrap()).unwrap();

    assert_eq!(store.get("old"), None);
    assert_eq!(store.get("new").as_deref(), Some("value"));
}

#[test]
fn test_restore_rejects_garbage_without_mutating() {
    let store = KeyValueStore::new();
    store.set("k", "v");
    assert!(store.restore(b"not json at all").is_err());
    // The mapping is untouched after a failed decode.
    assert_eq!(store.get("k").as_deref(), Some("v"));
}

#[tokio::test]
async fn test_concurrent_writers_on_distinct_keys_all_land() {
    let store = Arc::new(KeyValueStore::new());
    let mut handles = Vec::new();
    for i in 0..32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.set(format!("key{i}"), format!("value{i}"));
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.len(), 32);
    for i in 0..32 {
        assert_eq!(store.get(&format!("key{i}")), Some(format!("value{i}")));
    }
}

#[tokio::test]
async fn test_concurrent_writers_on_one_key_leave_exactly_one_value() {
    let store = Arc::new(KeyValueStore::new());
    let mut handles = Vec::new();
    for i in 0..32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.set("contended", format!("writer{i}"));
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // One of the written values, never a torn mix.
    let winner = store.get("contended").unwrap();
    assert!(
        (0..32).any(|i| winner == format!("writer{i}")),
        "unexpected final value: {winner}"
    );
    assert_eq!(store.len(), 1);
}
