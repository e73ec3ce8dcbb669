//! Error types for brain construction.

use thiserror::Error;

/// Errors raised while setting up a brain.
///
/// Completion failures at request time are not errors: they are reported as
/// [`crate::CompletionOutcome::Fallback`] so callers always get a reply.
#[derive(Debug, Error)]
pub enum BrainError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// HTTP client could not be created.
    #[error("network error: {0}")]
    Network(String),
}
