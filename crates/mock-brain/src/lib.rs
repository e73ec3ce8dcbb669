//! Mock brain implementations for orchestrator tests.
//!
//! This crate provides mock implementations of the `Brain` trait:
//! - `EchoBrain` - Answers with the user text and records every request
//! - `FailingBrain` - Always falls back with a fixed failure kind
//! - `DelayedBrain` - Wraps another brain with artificial delay
//!
//! For production completions, use the `openrouter-brain` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, CompletionRequest, EchoBrain};
//!
//! #[tokio::main]
//! async fn main() {
//!     let brain = EchoBrain::new();
//!
//!     let request = CompletionRequest::new("persona", "Hello!", "user:1");
//!
//!     let outcome = brain.complete(request).await;
//!     println!("Response: {}", outcome.text());
//! }
//! ```

mod delayed;
mod echo;
mod failing;

// Re-export brain-core types for convenience
pub use brain_core::{
    async_trait, Brain, CompletionOutcome, CompletionRequest, FailureKind, HistoryMessage,
};

pub use delayed::DelayedBrain;
pub use echo::EchoBrain;
pub use failing::FailingBrain;
