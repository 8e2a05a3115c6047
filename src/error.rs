//! Error types used throughout proxybridge.
//!
//! Only a handful of per-item conditions are recovered locally (see the
//! classification and matching modules); everything here escapes to the
//! single reporting boundary in `main`.

use std::time::Duration;

/// Errors raised by the host editing application adapter.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Attribute resolution failed for a single track item.
    /// Callers skip the item rather than aborting the run.
    #[error("Attribute resolution failed for item: {0}")]
    AttributeType(String),

    /// The host API rejected or could not service a request.
    #[error("Host API error: {0}")]
    Api(String),

    /// Transport-level failure reaching the host bridge.
    #[error("Host transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Top-level error type for proxybridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The run cannot proceed as configured. Fatal, non-zero exit.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A host API fault that is not recoverable per-item.
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// The worker pool rejected or lost a batch.
    #[error("Worker pool error: {0}")]
    Pool(String),

    /// The batch did not reach a terminal state within the configured wait.
    #[error("Batch did not finish within {0:?}")]
    BatchTimeout(Duration),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new Configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new Pool error.
    pub fn pool<S: Into<String>>(msg: S) -> Self {
        Self::Pool(msg.into())
    }
}

/// Result type alias using the proxybridge error type.
pub type Result<T> = std::result::Result<T, Error>;
