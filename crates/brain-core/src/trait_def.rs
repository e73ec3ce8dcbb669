//! The Brain trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::message::CompletionRequest;
use crate::outcome::CompletionOutcome;

/// A completion backend.
///
/// Implementations never fail outright: every error path is classified into
/// a [`CompletionOutcome::Fallback`] so the caller can always reply.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Produce a reply for the request.
    async fn complete(&self, request: CompletionRequest) -> CompletionOutcome;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

#[async_trait]
impl<B: Brain + ?Sized> Brain for Arc<B> {
    async fn complete(&self, request: CompletionRequest) -> CompletionOutcome {
        (**self).complete(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
