// src/server/shutdown.rs

//! The graceful-shutdown coordinator.

use crate::core::persistence;
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, info, warn};

/// Upper bound on waiting for killed sessions to wind down before their tasks
/// are aborted outright.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Orchestrates the stop sequence: halt the accept loop, drain and close the
/// remaining connections, persist the store, and only then let the process
/// exit.
///
/// The sequence runs at most once per process lifetime; any call after the
/// first is a no-op.
pub struct ShutdownCoordinator {
    state: Arc<ServerState>,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    accept_handle: Mutex<Option<JoinHandle<JoinSet<()>>>>,
    initiated: AtomicBool,
}

impl ShutdownCoordinator {
    pub fn new(
        state: Arc<ServerState>,
        shutdown_tx: tokio::sync::watch::Sender<bool>,
        accept_handle: JoinHandle<JoinSet<()>>,
    ) -> Self {
        Self {
            state,
            shutdown_tx,
            accept_handle: Mutex::new(Some(accept_handle)),
            initiated: AtomicBool::new(false),
        }
    }

    /// Runs the full shutdown sequence.
    ///
    /// A persistence failure in the final step does not abort the sequence:
    /// every connection is already closed by then, the failure is logged, and
    /// the error is returned so the caller can exit non-zero.
    pub async fn shutdown(&self) -> Result<()> {
        if self.initiated.swap(true, Ordering::SeqCst) {
            info!("Shutdown already in progress; ignoring repeated stop request.");
            return Ok(());
        }

        info!("Stopping DB server");

        // 1. Tell the accept loop to stop. send_replace never fails, even if
        //    the loop has already exited on its own.
        self.shutdown_tx.send_replace(true);

        // 2. Wait for the accept loop to acknowledge: its return means the
        //    listener is closed and hands us the live session tasks.
        let accept_handle = self
            .accept_handle
            .lock()
            .take()
            .context("Accept loop handle already taken")?;
        let mut sessions = accept_handle
            .await
            .context("Accept loop task failed")?;

        // 3. Drain: warn whoever is still connected, wait out the grace
        //    period, then force-close the rest.
        if !self.state.registry.is_empty() {
            let grace = self.state.config.shutdown.grace_period;
            info!(
                "Warning {} connected client(s); closing in {}s",
                self.state.registry.len(),
                grace.as_secs()
            );
            self.state
                .registry
                .broadcast(crate::connection::SessionControl::Warn(grace));
            tokio::time::sleep(grace).await;

            info!("Closing all connections");
            self.state.registry.kill_all();
        }

        if tokio::time::timeout(DRAIN_TIMEOUT, async {
            while sessions.join_next().await.is_some() {}
        })
        .await
        .is_err()
        {
            warn!("Timed out waiting for sessions to close cleanly; aborting them.");
            sessions.shutdown().await;
        }
        info!("All client connections closed.");

        // 4. Persist the store exactly once, synchronously with the sequence.
        info!("Saving store records ({} keys)", self.state.store.len());
        let path = &self.state.config.persistence.snapshot_path;
        if let Err(e) = persistence::save_snapshot(&self.state.store, path).await {
            error!(
                "CRITICAL: Final snapshot save to {path} failed: {e}. \
                 The on-disk snapshot is stale and data may be lost."
            );
            return Err(anyhow::Error::from(e).context("Final snapshot save failed"));
        }
        info!("Successfully saved store to {path}");

        // 5. Done; the caller may let the process exit.
        info!("Database server was successfully stopped");
        Ok(())
    }
}
