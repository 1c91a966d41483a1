// src/core/persistence/snapshot.rs

//! Reading and writing the on-disk snapshot file.
//!
//! The snapshot is a single JSON object mapping keys to values. It is read
//! once at startup and written once during shutdown; there is no background
//! saver in between.

use crate::core::errors::OpalError;
use crate::core::storage::KeyValueStore;
use std::io::ErrorKind;
use tokio::fs;
use tracing::{info, warn};

/// Loads the startup snapshot into a store.
pub struct SnapshotLoader {
    config: crate::config::PersistenceConfig,
}

impl SnapshotLoader {
    pub fn new(config: crate::config::PersistenceConfig) -> Self {
        Self { config }
    }

    /// Restores `store` from the configured snapshot file.
    ///
    /// A missing, unreadable, or undecodable file is never fatal: the failure
    /// is logged and the server starts with an empty store. Durability on the
    /// load side is strictly best-effort.
    pub async fn load_into(&self, store: &KeyValueStore) {
        let path = &self.config.snapshot_path;
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Snapshot file not found at {path}. Starting with an empty store.");
                return;
            }
            Err(e) => {
                warn!("Could not read snapshot file at {path}: {e}. Starting with an empty store.");
                return;
            }
        };

        match store.restore(&bytes) {
            Ok(()) => info!("Loaded {} key(s) from snapshot file {path}", store.len()),
            Err(e) => {
                warn!("Could not decode snapshot file at {path}: {e}. Starting with an empty store.");
            }
        }
    }
}

/// Writes a point-in-time snapshot of `store` to `path`.
///
/// The snapshot is first written to a temporary file in the same directory and
/// then renamed over the destination, so a crash mid-write cannot leave a
/// truncated snapshot where a good one used to be.
pub async fn save_snapshot(store: &KeyValueStore, path: &str) -> Result<(), OpalError> {
    let bytes = store.snapshot()?;

    let temp_path = format!("{path}.tmp.{}", std::process::id());
    if let Err(e) = fs::write(&temp_path, &bytes).await {
        // Attempt to clean up the incomplete file.
        if let Err(remove_err) = fs::remove_file(&temp_path).await {
            if remove_err.kind() != ErrorKind::NotFound {
                warn!("Additionally failed to remove temporary snapshot file '{temp_path}': {remove_err}");
            }
        }
        return Err(e.into());
    }

    fs::rename(&temp_path, path).await?;
    Ok(())
}
