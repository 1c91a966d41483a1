// src/core/state.rs

//! Defines the central `ServerState` struct, holding all shared server-wide state.

use crate::config::Config;
use crate::connection::ConnectionRegistry;
use crate::core::storage::KeyValueStore;
use std::sync::Arc;

/// The central struct holding all shared, server-wide state.
///
/// Wrapped in an `Arc` and passed to the accept loop, every connection
/// handler, and the shutdown coordinator. The store and the registry are the
/// only shared mutable resources in the process, and both synchronize
/// internally; `ServerState` itself is immutable after construction.
#[derive(Debug)]
pub struct ServerState {
    /// The server's runtime configuration, fixed for the process lifetime.
    pub config: Config,
    /// The guarded key-value mapping. This is the single authoritative copy.
    pub store: KeyValueStore,
    /// All currently live client sessions.
    pub registry: ConnectionRegistry,
}

impl ServerState {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config,
            store: KeyValueStore::new(),
            registry: ConnectionRegistry::new(),
        })
    }
}
