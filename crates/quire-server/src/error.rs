use std::net::SocketAddr;

use thiserror::Error;

use crate::config::LoadError;
use quire_core::BuildError;

/// Startup and serve-loop failures. Per-request errors never end up here.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("failed to wire job orchestrator: {0}")]
    Build(#[from] BuildError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("http server stopped: {0}")]
    Serve(#[source] std::io::Error),
}

impl ServerError {
    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
