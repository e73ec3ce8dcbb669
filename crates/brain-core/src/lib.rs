//! Core trait and types for completion backends.
//!
//! This crate provides the shared interface between the conversation
//! orchestrator and whatever produces replies. It defines:
//!
//! - [`Brain`] - The trait every completion backend implements
//! - [`CompletionRequest`] / [`HistoryMessage`] / [`Role`] - Prompt inputs
//! - [`CompletionOutcome`] / [`FailureKind`] - Answer or classified failure
//! - [`BrainError`] - Setup errors (configuration, HTTP client)
//!
//! # Example
//!
//! ```rust
//! use brain_core::{async_trait, Brain, CompletionOutcome, CompletionRequest};
//!
//! struct ShoutBrain;
//!
//! #[async_trait]
//! impl Brain for ShoutBrain {
//!     async fn complete(&self, request: CompletionRequest) -> CompletionOutcome {
//!         CompletionOutcome::Answer(request.user_text.to_uppercase())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "ShoutBrain"
//!     }
//! }
//! ```

mod error;
mod message;
mod outcome;
mod prompt;
mod trait_def;

pub use error::BrainError;
pub use message::{CompletionRequest, HistoryMessage, Role};
pub use outcome::{CompletionOutcome, FailureKind};
pub use prompt::{hash_prompt, preview};
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
