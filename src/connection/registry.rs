// src/connection/registry.rs

//! Defines `ConnectionRegistry`, the tracked set of live client sessions.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Control messages delivered to a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    /// The server is shutting down; the session should warn its client that
    /// it will be closed after the given grace period, then keep serving.
    Warn(Duration),
    /// Close the connection now.
    Kill,
}

/// The registry's view of one live session: where it connected from and how
/// to signal it. The session keeps the receiving end and owns the socket.
#[derive(Debug)]
pub struct SessionHandle {
    pub addr: SocketAddr,
    control: mpsc::UnboundedSender<SessionControl>,
}

impl SessionHandle {
    pub fn new(addr: SocketAddr, control: mpsc::UnboundedSender<SessionControl>) -> Self {
        Self { addr, control }
    }
}

/// Tracks every live connection by its session id.
///
/// The map is guarded by a single mutex so registration and removal are
/// mutually exclusive with enumeration: the shutdown coordinator never
/// iterates a map that a session is concurrently mutating. Sessions are
/// inserted by the accept loop and removed exactly once by the owning
/// session's guard; `kill_all` only signals, it does not remove.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: Mutex<HashMap<u64, SessionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a session under `id`. Ids come from a monotonic counter, so a
    /// collision means a bookkeeping bug; the old entry is replaced and the
    /// event logged rather than panicking in the accept path.
    pub fn register(&self, id: u64, handle: SessionHandle) {
        if let Some(old) = self.sessions.lock().insert(id, handle) {
            warn!("Session id {id} was already registered (for {}); replacing it.", old.addr);
        }
    }

    /// Removes a session. Returns false if it was already gone.
    pub fn unregister(&self, id: u64) -> bool {
        self.sessions.lock().remove(&id).is_some()
    }

    /// Number of currently registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Sends `message` to every registered session. A send failure means the
    /// session is already tearing down, which is fine: its entry disappears
    /// when its guard runs.
    pub fn broadcast(&self, message: SessionControl) {
        for handle in self.sessions.lock().values() {
            let _ = handle.control.send(message);
        }
    }

    /// Signals every registered session to close its connection.
    pub fn kill_all(&self) {
        self.broadcast(SessionControl::Kill);
    }
}
