// src/connection/guard.rs

//! Defines `SessionGuard`, an RAII guard for connection resource management.

use crate::core::state::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

/// An RAII guard to ensure a session is always unregistered when its handler
/// scope is exited, no matter which path closed the connection.
pub struct SessionGuard {
    state: Arc<ServerState>,
    session_id: u64,
    addr: SocketAddr,
}

impl SessionGuard {
    pub(crate) fn new(state: Arc<ServerState>, session_id: u64, addr: SocketAddr) -> Self {
        Self {
            state,
            session_id,
            addr,
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.state.registry.unregister(self.session_id) {
            info!("Client with id {} left ({})", self.session_id, self.addr);
        } else {
            // Removal happens exactly once; reaching this means someone else
            // already took the entry out.
            debug!(
                "Session {} for {} was not in the registry upon cleanup.",
                self.session_id, self.addr
            );
        }
    }
}
