// src/server/initialization.rs

//! Handles the complete server initialization process, from state setup
//! through persistence loading to binding the listening socket.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::persistence::SnapshotLoader;
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

/// Initializes all server components before starting the accept loop.
pub async fn setup(config: Config, shutdown_rx: watch::Receiver<bool>) -> Result<ServerContext> {
    let state = ServerState::new(config);
    info!("Server state initialized.");

    // Load the startup snapshot. Absence or corruption is handled inside the
    // loader and is never fatal.
    let loader = SnapshotLoader::new(state.config.persistence.clone());
    loader.load_into(&state.store).await;

    // Bind failure, by contrast, is fatal: the server has no reason to exist
    // without its socket.
    let listener = TcpListener::bind((state.config.host.as_str(), state.config.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind listener on {}:{}",
                state.config.host, state.config.port
            )
        })?;
    info!(
        "OpalDB server listening on {}:{}",
        state.config.host, state.config.port
    );

    Ok(ServerContext {
        state,
        listener,
        shutdown_rx,
    })
}
