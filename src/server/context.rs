// src/server/context.rs

use crate::core::state::ServerState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Holds all the initialized state required to run the accept loop.
pub struct ServerContext {
    pub state: Arc<ServerState>,
    pub listener: TcpListener,
    /// Flipped to `true` exactly once by the shutdown coordinator.
    pub shutdown_rx: watch::Receiver<bool>,
}
