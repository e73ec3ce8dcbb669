//! OpenRouter-backed brain implementation.
//!
//! This crate provides a [`Brain`] that sends the persona prompt, recent
//! history, and the new user turn to an OpenAI-compatible chat-completions
//! endpoint (OpenRouter by default).
//!
//! # Features
//!
//! - Up to three attempts on HTTP 429 with 1s/2s/4s backoff
//! - 401 / 400 / other errors classified without retry
//! - Hard per-attempt timeout
//! - Transport and sleep are traits, so the retry loop runs in tests without
//!   network or real waiting
//!
//! # Usage
//!
//! ```rust,no_run
//! use openrouter_brain::{Brain, CompletionRequest, OpenRouterBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = OpenRouterBrain::from_env()?;
//!     let outcome = brain
//!         .complete(CompletionRequest::new("Be brief.", "Салам!", "user:1"))
//!         .await;
//!     println!("{}", outcome.text());
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;
mod retry;
mod transport;

pub use api_types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use brain::OpenRouterBrain;
pub use config::{OpenRouterConfig, OpenRouterConfigBuilder, DEFAULT_API_URL, DEFAULT_MODEL};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use transport::{ChatTransport, RawResponse, ReqwestTransport, TransportError};

// Re-export brain-core types for convenience
pub use brain_core::{
    async_trait, Brain, BrainError, CompletionOutcome, CompletionRequest, FailureKind,
    HistoryMessage,
};
