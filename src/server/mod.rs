// src/server/mod.rs

//! Server assembly: initialization, the accept loop, and the shutdown sequence.

use crate::config::Config;
use crate::core::state::ServerState;
use anyhow::{Result, anyhow};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::watch;
use tracing::info;

mod accept_loop;
mod context;
mod initialization;
mod shutdown;

pub use shutdown::ShutdownCoordinator;

/// A running OpalDB server instance.
///
/// There is exactly one of these per process, explicitly constructed and
/// explicitly stopped; nothing about the server lives in global state.
pub struct Server {
    state: Arc<ServerState>,
    coordinator: ShutdownCoordinator,
    local_addr: SocketAddr,
}

impl Server {
    /// Loads the startup snapshot, binds the listener (fatal on failure), and
    /// spawns the accept loop.
    pub async fn start(config: Config) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let ctx = initialization::setup(config, shutdown_rx).await?;
        let local_addr = ctx.listener.local_addr()?;
        let state = ctx.state.clone();
        let accept_handle = tokio::spawn(accept_loop::run(ctx));
        let coordinator = ShutdownCoordinator::new(state.clone(), shutdown_tx, accept_handle);
        Ok(Self {
            state,
            coordinator,
            local_addr,
        })
    }

    /// The address the listener is actually bound to (useful when the
    /// configured port is 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The shared server state: store and registry.
    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Runs the graceful shutdown sequence to completion. Idempotent; see
    /// [`ShutdownCoordinator`].
    pub async fn stop(&self) -> Result<()> {
        self.coordinator.shutdown().await
    }
}

/// The main server entry point: start, block until SIGINT or SIGTERM, then
/// run the shutdown sequence. The process must not exit before `stop`
/// completes, so this returns only once the store has been persisted.
pub async fn run(config: Config) -> Result<()> {
    let server = Server::start(config).await?;

    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow!("Failed to register SIGINT handler: {}", e))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow!("Failed to register SIGTERM handler: {}", e))?;

    tokio::select! {
        _ = sigint.recv() => info!("SIGINT received, initiating graceful shutdown."),
        _ = sigterm.recv() => info!("SIGTERM received, initiating graceful shutdown."),
    }

    server.stop().await
}
