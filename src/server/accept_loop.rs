// src/server/accept_loop.rs

//! The connection acceptance loop.
//!
//! Accepting is cooperative-cancellation by polling: each wait for a new
//! connection is bounded by `shutdown.accept_poll_interval`, and the stop
//! flag is re-checked at every poll boundary. Shutdown latency is therefore
//! bounded by the poll interval rather than instantaneous, which keeps the
//! loop free of any signal plumbing of its own.

use super::context::ServerContext;
use crate::connection::{ConnectionHandler, SessionHandle};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Runs the accept loop until shutdown is requested.
///
/// Returns the `JoinSet` of still-running session tasks so the shutdown
/// coordinator can drain them; the listening socket is closed before this
/// function returns, which is the coordinator's acknowledgment that no new
/// connections will arrive.
pub async fn run(ctx: ServerContext) -> JoinSet<()> {
    let mut session_id_counter: u64 = 0;
    let mut sessions = JoinSet::new();
    let poll_interval = ctx.state.config.shutdown.accept_poll_interval;

    info!("Listening for clients");
    loop {
        if *ctx.shutdown_rx.borrow() {
            info!("Shutting down the server");
            break;
        }

        // Reap sessions that have already finished so the set does not grow
        // with the total number of connections ever served.
        while let Some(res) = sessions.try_join_next() {
            if let Err(e) = res {
                if e.is_panic() {
                    error!("A session task panicked: {e:?}");
                }
            }
        }

        match timeout(poll_interval, ctx.listener.accept()).await {
            // Poll deadline reached with no new client; go around and
            // re-check the stop flag.
            Err(_elapsed) => continue,
            Ok(Ok((socket, addr))) => {
                session_id_counter = session_id_counter.wrapping_add(1);
                let session_id = session_id_counter;
                info!("Client with id {session_id} joined ({addr})");

                let (control_tx, control_rx) = mpsc::unbounded_channel();
                ctx.state
                    .registry
                    .register(session_id, SessionHandle::new(addr, control_tx));

                let state = ctx.state.clone();
                sessions.spawn(async move {
                    let mut handler =
                        ConnectionHandler::new(socket, addr, state, session_id, control_rx);
                    if let Err(e) = handler.run().await {
                        warn!("Connection from {} terminated unexpectedly: {}", addr, e);
                    }
                });
            }
            // Best-effort availability: a failed accept is logged and the
            // loop keeps serving.
            Ok(Err(e)) => error!("Failed to accept connection: {}", e),
        }
    }

    // Close the listening socket; no further connections can be accepted.
    drop(ctx.listener);
    sessions
}
