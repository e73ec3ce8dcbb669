//! Bot settings from the environment.

use std::env;

use brain_core::BrainError;
use openrouter_brain::OpenRouterConfig;
use orchestrator::OrchestratorConfig;
use telegram_client::{BotConfig, TelegramError};
use thiserror::Error;

/// Database used when `SQLITE_PATH` is unset.
pub const DEFAULT_SQLITE_PATH: &str = "sqlite:magabot.db?mode=rwc";

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Telegram settings are missing or invalid.
    #[error("telegram: {0}")]
    Telegram(#[from] TelegramError),

    /// Completion backend settings are missing or invalid.
    #[error("brain: {0}")]
    Brain(#[from] BrainError),
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// sqlx SQLite URL.
    pub database_url: String,
    pub telegram: BotConfig,
    pub brain: OpenRouterConfig,
    pub orchestrator: OrchestratorConfig,
}

impl AppConfig {
    /// Read all settings. `BOT_TOKEN` and `OPENROUTER_API_KEY` are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("SQLITE_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());

        Ok(Self {
            database_url,
            telegram: BotConfig::from_env()?,
            brain: OpenRouterConfig::from_env()?,
            orchestrator: OrchestratorConfig::from_env(),
        })
    }
}
