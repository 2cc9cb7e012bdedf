//! Daemon error types.

use rslist_service::ServiceError;
use rslist_store::StoreError;
use thiserror::Error;

/// Daemon-level errors.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Service error
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Metrics registration or encoding failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server failed after startup
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;
