//! Orchestrator tunables.

use std::env;
use std::path::Path;

use tracing::{info, warn};

/// Default path for the persona prompt file.
pub const DEFAULT_SYSTEM_PROMPT_FILE: &str = "SYSTEM_PROMPT.md";

/// Default trigger prefix.
pub const DEFAULT_TRIGGER_PREFIX: &str = "Мага,";

/// Built-in persona (fallback if neither env var nor file is present).
pub const DEFAULT_SYSTEM_PROMPT: &str = "Ты из Дагестана, тебя зовут Мага. \
Отвечаешь коротко, резко, немного токсично, по существу и лаконично, с кавказским стилем. \
Используешь простые слова, немного юмора и сарказма. БЕЗ МАТА и без религиозной тематики.";

/// Configuration for the conversation orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Persona sent as the system message.
    pub system_prompt: String,
    /// Messages must start with this (case-insensitive) to reach the brain.
    pub trigger_prefix: String,
    /// Days granted per payment.
    pub access_days: i64,
    /// History turns kept per user.
    pub max_history: i64,
    /// User allowed to run `/grant` and `/grant_group`.
    pub admin_id: Option<i64>,
    /// Invoice amount in the smallest currency unit.
    pub pay_amount: i64,
    /// Invoice currency code (`XTR` is Telegram Stars).
    pub pay_currency: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            trigger_prefix: DEFAULT_TRIGGER_PREFIX.to_string(),
            access_days: 30,
            max_history: 10,
            admin_id: None,
            pay_amount: 10,
            pay_currency: "XTR".to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `ACCESS_DAYS` - Days granted per payment (default: 30)
    /// - `MAX_HISTORY` - History turns kept per user (default: 10)
    /// - `ADMIN_ID` - Telegram user id allowed to grant access manually
    /// - `PAY_AMOUNT` - Invoice amount (default: 10)
    /// - `PAY_CURRENCY` - Invoice currency (default: XTR)
    /// - `TRIGGER_PREFIX` - Trigger prefix (default: "Мага,")
    /// - `SYSTEM_PROMPT` / `SYSTEM_PROMPT_FILE` - Persona, see [`load_system_prompt`]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let access_days = env::var("ACCESS_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|days: &i64| *days > 0)
            .unwrap_or(defaults.access_days);

        let max_history = env::var("MAX_HISTORY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|turns: &i64| *turns > 0)
            .unwrap_or(defaults.max_history);

        let admin_id = match env::var("ADMIN_ID") {
            Ok(raw) => match raw.trim().parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!("ADMIN_ID is not a number, admin commands disabled");
                    None
                }
            },
            Err(_) => None,
        };

        let pay_amount = env::var("PAY_AMOUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|amount: &i64| *amount > 0)
            .unwrap_or(defaults.pay_amount);

        let pay_currency = env::var("PAY_CURRENCY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.pay_currency);

        let trigger_prefix = env::var("TRIGGER_PREFIX")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.trigger_prefix);

        Self {
            system_prompt: load_system_prompt(),
            trigger_prefix,
            access_days,
            max_history,
            admin_id,
            pay_amount,
            pay_currency,
        }
    }

    /// Create a new config builder.
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }

    /// Whether `user_id` may run admin commands.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_id == Some(user_id)
    }
}

/// Builder for OrchestratorConfig.
#[derive(Debug, Default)]
pub struct OrchestratorConfigBuilder {
    config: OrchestratorConfig,
}

impl OrchestratorConfigBuilder {
    /// Set the persona prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    /// Set the trigger prefix.
    pub fn trigger_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.trigger_prefix = prefix.into();
        self
    }

    /// Set the access period in days.
    pub fn access_days(mut self, days: i64) -> Self {
        self.config.access_days = days;
        self
    }

    /// Set the history window.
    pub fn max_history(mut self, turns: i64) -> Self {
        self.config.max_history = turns;
        self
    }

    /// Set the admin user id.
    pub fn admin_id(mut self, id: i64) -> Self {
        self.config.admin_id = Some(id);
        self
    }

    /// Set the invoice amount.
    pub fn pay_amount(mut self, amount: i64) -> Self {
        self.config.pay_amount = amount;
        self
    }

    /// Set the invoice currency.
    pub fn pay_currency(mut self, currency: impl Into<String>) -> Self {
        self.config.pay_currency = currency.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OrchestratorConfig {
        self.config
    }
}

/// Load the persona prompt.
///
/// Priority:
/// 1. `SYSTEM_PROMPT` env var (if set)
/// 2. Contents of prompt file (`SYSTEM_PROMPT_FILE` or default `SYSTEM_PROMPT.md`)
/// 3. Embedded default prompt
pub fn load_system_prompt() -> String {
    if let Ok(prompt) = env::var("SYSTEM_PROMPT") {
        if !prompt.trim().is_empty() {
            info!("Using system prompt from SYSTEM_PROMPT env var");
            return prompt.trim().to_string();
        }
    }

    let prompt_file = env::var("SYSTEM_PROMPT_FILE")
        .unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT_FILE.to_string());

    if let Some(prompt) = load_prompt_file(&prompt_file) {
        info!("Loaded system prompt from {}", prompt_file);
        return prompt;
    }

    info!("Using embedded default system prompt");
    DEFAULT_SYSTEM_PROMPT.to_string()
}

/// Returns `Some(content)` if the file exists and is non-empty.
fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
