//! Error types for orchestrator operations.

use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while handling an update.
///
/// None of these reach the user verbatim: the orchestrator logs them and
/// replies with a fixed text.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Storage failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// A settlement payload could not be applied.
    #[error("settlement failed: {0}")]
    Settlement(String),
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
