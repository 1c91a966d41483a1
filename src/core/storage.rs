// src/core/storage.rs

//! Defines `KeyValueStore`, the guarded in-memory keyspace.

use crate::core::errors::OpalError;
use parking_lot::RwLock;
use std::collections::HashMap;

/// The in-memory key-value mapping and its synchronization.
///
/// All access goes through this type; the underlying map is never handed out.
/// Writers (`set`, `delete`, `restore`) take the write lock and are mutually
/// exclusive with everything else; readers (`get`, `snapshot`, `len`) take the
/// read lock and may overlap each other. Critical sections are short and never
/// held across an await point, so a blocking lock is the right tool here.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    items: RwLock<HashMap<String, String>>,
}

impl KeyValueStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a key. Always succeeds.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.items.write().insert(key.into(), value.into());
    }

    /// Returns the current value for `key`, or `None` if it is absent.
    pub fn get(&self, key: &str) -> Option<String> {
        self.items.read().get(key).cloned()
    }

    /// Removes `key` if present. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) {
        self.items.write().remove(key);
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Serializes the entire mapping as a single JSON object at one point in
    /// time. The read lock is held for the duration of the encode, so the
    /// dump is self-consistent.
    pub fn snapshot(&self) -> Result<Vec<u8>, OpalError> {
        let items = self.items.read();
        Ok(serde_json::to_vec(&*items)?)
    }

    /// Replaces the in-memory mapping with the decoded content of `bytes`.
    /// On a decode failure the mapping is left untouched and the error is
    /// returned for the caller to report; the process must keep running.
    pub fn restore(&self, bytes: &[u8]) -> Result<(), OpalError> {
        let decoded: HashMap<String, String> = serde_json::from_slice(bytes)?;
        *self.items.write() = decoded;
        Ok(())
    }
}
