// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug, Clone)]
pub enum OpalError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Snapshot Error: {0}")]
    Snapshot(String),
}

impl From<std::io::Error> for OpalError {
    fn from(err: std::io::Error) -> Self {
        // Wrapped in an Arc because `io::Error` is not `Clone`.
        OpalError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for OpalError {
    fn from(err: serde_json::Error) -> Self {
        OpalError::Snapshot(err.to_string())
    }
}
