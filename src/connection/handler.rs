// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a client connection.

use super::guard::SessionGuard;
use super::registry::SessionControl;
use crate::core::OpalError;
use crate::core::commands::{Command, Reply};
use crate::core::protocol::LineCodec;
use crate::core::state::ServerState;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// The greeting sent to every client immediately after its connection is accepted.
const WELCOME: &str = "Welcome to OpalDB server";

/// Manages the full lifecycle of a client connection: greet, then repeatedly
/// read a line, execute it, and write the reply, until the client exits, the
/// peer disappears, or the shutdown coordinator signals the session.
pub struct ConnectionHandler {
    framed: Framed<TcpStream, LineCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    control_rx: mpsc::UnboundedReceiver<SessionControl>,
}

impl ConnectionHandler {
    /// Creates a new `ConnectionHandler` over an accepted socket.
    pub fn new(
        socket: TcpStream,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
        control_rx: mpsc::UnboundedReceiver<SessionControl>,
    ) -> Self {
        Self {
            framed: Framed::new(socket, LineCodec::new()),
            addr,
            state,
            session_id,
            control_rx,
        }
    }

    /// The main event loop for the connection.
    ///
    /// Any error returned here is a connection-level fault: the caller logs it
    /// and the session ends, but the server keeps running. The guard
    /// unregisters the session on every exit path, error or not.
    pub async fn run(&mut self) -> Result<(), OpalError> {
        let _guard = SessionGuard::new(self.state.clone(), self.session_id, self.addr);

        self.framed.send(WELCOME).await?;

        loop {
            tokio::select! {
                // Prioritize shutdown signals over client input.
                biased;
                Some(control) = self.control_rx.recv() => match control {
                    SessionControl::Warn(grace) => {
                        info!("Session {} notified of impending shutdown.", self.session_id);
                        let warning = format!(
                            "Host wants to shut down the server in: {}s",
                            grace.as_secs()
                        );
                        self.framed.send(warning).await?;
                    }
                    SessionControl::Kill => {
                        info!("Session {} force-closed by shutdown coordinator.", self.session_id);
                        return Ok(());
                    }
                },
                result = self.framed.next() => {
                    match result {
                        Some(Ok(line)) => {
                            debug!("Session {}: received line: {:?}", self.session_id, line);
                            match Command::parse(&line).apply(&self.state.store) {
                                Reply::Message(reply) => self.framed.send(reply).await?,
                                Reply::Terminate => {
                                    debug!("Session {} closed by exit command.", self.session_id);
                                    return Ok(());
                                }
                            }
                        }
                        Some(Err(e)) => {
                            warn!("Connection error for {}: {}", self.addr, e);
                            return Err(e);
                        }
                        None => {
                            debug!("Connection from {} closed by peer.", self.addr);
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
