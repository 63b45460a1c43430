//! Error types for the sync layer.

use plantlux_types::PlantId;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Whether retrying the same operation may succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Transient: the network, a timeout, or a server-side fault.
    Retryable,
    /// The request itself was refused or could not be understood.
    Permanent,
}

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No response from the inventory service.
    #[error("network error: {0}")]
    Network(String),

    /// The request or the whole operation exceeded its deadline.
    #[error("operation timed out")]
    Timeout,

    /// Non-success status from the inventory service.
    #[error("remote rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The targeted record does not exist remotely.
    #[error("plant not found: {0}")]
    NotFound(PlantId),

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The request was refused locally before reaching the service.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// The mutation was accepted remotely but the follow-up reload failed,
    /// so the local view is stale.
    #[error("change applied but refresh failed: {0}")]
    RefreshFailed(Box<SyncError>),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The controller task is no longer running.
    #[error("channel closed")]
    ChannelClosed,
}

impl SyncError {
    /// Classifies the error for the caller's retry decision.
    pub fn failure(&self) -> Failure {
        match self {
            SyncError::Network(_) | SyncError::Timeout => Failure::Retryable,
            SyncError::Rejected { status, .. } => {
                if *status == 408 || *status == 429 || *status >= 500 {
                    Failure::Retryable
                } else {
                    Failure::Permanent
                }
            }
            // Only the reload needs repeating; the change itself is durable.
            SyncError::RefreshFailed(_) => Failure::Retryable,
            SyncError::NotFound(_)
            | SyncError::Decode(_)
            | SyncError::InvalidRecord(_)
            | SyncError::Config(_)
            | SyncError::ChannelClosed => Failure::Permanent,
        }
    }

    /// Shorthand for `failure() == Failure::Retryable`.
    pub fn is_retryable(&self) -> bool {
        self.failure() == Failure::Retryable
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::Timeout
        } else if err.is_decode() {
            SyncError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            SyncError::Rejected {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            SyncError::Network(err.to_string())
        }
    }
}
