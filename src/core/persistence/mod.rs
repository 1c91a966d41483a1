// src/core/persistence/mod.rs

//! Snapshot-based persistence: load at startup, save once at shutdown.

mod snapshot;

pub use snapshot::{SnapshotLoader, save_snapshot};
