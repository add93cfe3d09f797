//! Error types for the Cora proxy

use std::io;

use thiserror::Error;

/// Result type alias for the Cora proxy
pub type Result<T> = std::result::Result<T, Error>;

/// Cora proxy errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error. The only class that may abort the process;
    /// everything else is converted to an HTTP response at the request
    /// boundary.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure reaching the upstream (DNS, TLS handshake,
    /// connection reset, timeout). Surfaced to callers as a 500 with a
    /// JSON error envelope. Upstream non-2xx responses are not errors;
    /// their status and body relay verbatim.
    #[error("Upstream transport error: {0}")]
    Upstream(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Upstream(e.to_string())
    }
}
