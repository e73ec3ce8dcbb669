//! Error types for telegram-client.

use thiserror::Error;

/// Errors that can occur when talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed. The URL carries the token, so it is stripped
    /// before wrapping.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The Bot API answered `ok: false`.
    #[error("API error {code}: {description}")]
    Api { code: i64, description: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
