//! Configuration types for telegram-client.

use std::env;
use std::fmt;

use crate::error::TelegramError;

/// Public Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Long-poll timeout passed to `getUpdates`.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Configuration for talking to the Bot API.
#[derive(Clone)]
pub struct BotConfig {
    /// Base URL of the Bot API (e.g., "https://api.telegram.org").
    pub api_url: String,
    /// Bot token from @BotFather.
    pub token: String,
    /// Seconds the server may hold a `getUpdates` call open.
    pub poll_timeout_secs: u64,
}

impl BotConfig {
    /// Create a new configuration for the public Bot API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }

    /// Point at a different Bot API server (local bot-api, tests).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the long-poll timeout.
    pub fn with_poll_timeout(mut self, secs: u64) -> Self {
        self.poll_timeout_secs = secs;
        self
    }

    /// Load from environment variables.
    ///
    /// Required: `BOT_TOKEN`. Optional: `TELEGRAM_API_URL`,
    /// `TELEGRAM_POLL_TIMEOUT`.
    pub fn from_env() -> Result<Self, TelegramError> {
        let token = env::var("BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| TelegramError::Config("BOT_TOKEN not set".to_string()))?;

        let mut config = Self::new(token.trim());
        if let Ok(url) = env::var("TELEGRAM_API_URL") {
            if !url.trim().is_empty() {
                config = config.with_api_url(url.trim());
            }
        }
        if let Some(secs) = env::var("TELEGRAM_POLL_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.poll_timeout_secs = secs;
        }

        Ok(config)
    }

    /// URL of a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("api_url", &self.api_url)
            .field("token", &"[redacted]")
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}
