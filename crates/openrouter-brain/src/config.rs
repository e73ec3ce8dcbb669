//! Configuration for OpenRouterBrain.

use std::env;
use std::fmt;
use std::time::Duration;

use brain_core::BrainError;

/// Default OpenRouter chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model.
pub const DEFAULT_MODEL: &str = "mistralai/devstral-2512:free";

/// Configuration for OpenRouterBrain.
#[derive(Clone)]
pub struct OpenRouterConfig {
    /// Full chat-completions URL.
    pub api_url: String,

    /// API key for bearer authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Wall-clock ceiling for a single attempt.
    pub timeout: Duration,

    /// Total attempts when rate limited (first try included).
    pub max_attempts: u32,

    /// Base delay for rate-limit backoff; attempt `n` waits `base * 2^n`.
    pub backoff_base: Duration,

    /// Optional `HTTP-Referer` header used by OpenRouter rankings.
    pub http_referer: Option<String>,

    /// Optional `X-Title` header used by OpenRouter rankings.
    pub x_title: Option<String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: Some(150),
            temperature: Some(0.8),
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            http_referer: None,
            x_title: None,
        }
    }
}

impl fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .field("backoff_base", &self.backoff_base)
            .field("http_referer", &self.http_referer)
            .field("x_title", &self.x_title)
            .finish()
    }
}

impl OpenRouterConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENROUTER_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENROUTER_API_URL` - Endpoint (default: OpenRouter chat completions)
    /// - `OPENROUTER_MODEL` - Model name (default: mistralai/devstral-2512:free)
    /// - `OPENROUTER_MAX_TOKENS` - Max tokens (default: 150)
    /// - `OPENROUTER_TEMPERATURE` - Temperature (default: 0.8)
    /// - `OPENROUTER_TIMEOUT_SECS` - Per-attempt timeout (default: 30)
    /// - `OPENROUTER_MAX_ATTEMPTS` - Attempts on rate limiting (default: 3)
    /// - `HTTP_REFERER` / `X_TITLE` - Optional ranking headers
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BrainError::Configuration("OPENROUTER_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        let api_url = env::var("OPENROUTER_API_URL").unwrap_or(defaults.api_url);

        let model = env::var("OPENROUTER_MODEL").unwrap_or(defaults.model);

        let max_tokens = env::var("OPENROUTER_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let temperature = env::var("OPENROUTER_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let timeout = env::var("OPENROUTER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let max_attempts = env::var("OPENROUTER_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|attempts: &u32| *attempts > 0)
            .unwrap_or(defaults.max_attempts);

        let http_referer = env::var("HTTP_REFERER").ok().filter(|v| !v.is_empty());
        let x_title = env::var("X_TITLE").ok().filter(|v| !v.is_empty());

        Ok(Self {
            api_url,
            api_key,
            model,
            max_tokens,
            temperature,
            timeout,
            max_attempts,
            backoff_base: defaults.backoff_base,
            http_referer,
            x_title,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenRouterConfigBuilder {
        OpenRouterConfigBuilder::default()
    }
}

/// Builder for OpenRouterConfig.
#[derive(Debug, Default)]
pub struct OpenRouterConfigBuilder {
    config: OpenRouterConfig,
}

impl OpenRouterConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the number of attempts.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts.max(1);
        self
    }

    /// Set the backoff base delay.
    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.config.backoff_base = base;
        self
    }

    /// Set the `HTTP-Referer` header.
    pub fn http_referer(mut self, referer: impl Into<String>) -> Self {
        self.config.http_referer = Some(referer.into());
        self
    }

    /// Set the `X-Title` header.
    pub fn x_title(mut self, title: impl Into<String>) -> Self {
        self.config.x_title = Some(title.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenRouterConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenRouterConfig::default();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, Some(150));
        assert_eq!(config.temperature, Some(0.8));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff_base, Duration::from_secs(1));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = OpenRouterConfig::builder().api_key("sk-or-secret").build();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-or-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_builder_all_options() {
        let config = OpenRouterConfig::builder()
            .api_key("my-key")
            .api_url("http://127.0.0.1:9/v1/chat/completions")
            .model("some/model")
            .max_tokens(64)
            .temperature(0.2)
            .timeout(Duration::from_secs(5))
            .max_attempts(0)
            .backoff_base(Duration::from_millis(10))
            .http_referer("https://t.me/magabot")
            .x_title("MagaBot")
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.api_url, "http://127.0.0.1:9/v1/chat/completions");
        assert_eq!(config.model, "some/model");
        assert_eq!(config.max_tokens, Some(64));
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.timeout, Duration::from_secs(5));
        // At least one attempt is always made.
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.backoff_base, Duration::from_millis(10));
        assert_eq!(config.http_referer.as_deref(), Some("https://t.me/magabot"));
        assert_eq!(config.x_title.as_deref(), Some("MagaBot"));
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_vars() {
            for var in [
                "OPENROUTER_API_KEY",
                "OPENROUTER_API_URL",
                "OPENROUTER_MODEL",
                "OPENROUTER_MAX_TOKENS",
                "OPENROUTER_TEMPERATURE",
                "OPENROUTER_TIMEOUT_SECS",
                "OPENROUTER_MAX_ATTEMPTS",
                "HTTP_REFERER",
                "X_TITLE",
            ] {
                std::env::remove_var(var);
            }
        }

        // Missing API key should error
        clear_all_vars();
        match OpenRouterConfig::from_env() {
            Err(BrainError::Configuration(msg)) => assert!(msg.contains("OPENROUTER_API_KEY")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        // Only API key set, defaults used
        clear_all_vars();
        std::env::set_var("OPENROUTER_API_KEY", "test-env-key");
        let config = OpenRouterConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_attempts, 3);
        assert!(config.http_referer.is_none());

        // All vars set
        clear_all_vars();
        std::env::set_var("OPENROUTER_API_KEY", "full-key");
        std::env::set_var("OPENROUTER_API_URL", "http://localhost:1234/v1/chat/completions");
        std::env::set_var("OPENROUTER_MODEL", "other/model");
        std::env::set_var("OPENROUTER_MAX_TOKENS", "300");
        std::env::set_var("OPENROUTER_TEMPERATURE", "0.5");
        std::env::set_var("OPENROUTER_TIMEOUT_SECS", "10");
        std::env::set_var("OPENROUTER_MAX_ATTEMPTS", "5");
        std::env::set_var("HTTP_REFERER", "https://t.me/magabot");
        std::env::set_var("X_TITLE", "MagaBot");
        let config = OpenRouterConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://localhost:1234/v1/chat/completions");
        assert_eq!(config.model, "other/model");
        assert_eq!(config.max_tokens, Some(300));
        assert_eq!(config.temperature, Some(0.5));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.http_referer.as_deref(), Some("https://t.me/magabot"));
        assert_eq!(config.x_title.as_deref(), Some("MagaBot"));

        // Zero attempts falls back to the default
        clear_all_vars();
        std::env::set_var("OPENROUTER_API_KEY", "k");
        std::env::set_var("OPENROUTER_MAX_ATTEMPTS", "0");
        let config = OpenRouterConfig::from_env().unwrap();
        assert_eq!(config.max_attempts, 3);

        // Zero timeout falls back to the default
        clear_all_vars();
        std::env::set_var("OPENROUTER_API_KEY", "k");
        std::env::set_var("OPENROUTER_TIMEOUT_SECS", "0");
        let config = OpenRouterConfig::from_env().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));

        clear_all_vars();
    }
}
