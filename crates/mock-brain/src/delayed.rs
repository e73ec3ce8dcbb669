//! Delayed brain implementation - wraps another brain with artificial delay.

use std::time::Duration;

use brain_core::{async_trait, Brain, CompletionOutcome, CompletionRequest};
use tokio::time::sleep;

/// A brain that wraps another brain and adds artificial delay.
///
/// Useful for holding a per-user slot open while a second message arrives.
pub struct DelayedBrain<B: Brain> {
    inner: B,
    delay: Duration,
}

impl<B: Brain> DelayedBrain<B> {
    /// Create a new DelayedBrain wrapping the given brain with the specified delay.
    pub fn new(inner: B, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a brain with a delay in milliseconds.
    pub fn with_millis(inner: B, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<B: Brain> Brain for DelayedBrain<B> {
    async fn complete(&self, request: CompletionRequest) -> CompletionOutcome {
        sleep(self.delay).await;
        self.inner.complete(request).await
    }

    fn name(&self) -> &str {
        "DelayedBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EchoBrain;

    #[tokio::test(start_paused = true)]
    async fn test_delayed_brain() {
        let brain = DelayedBrain::with_millis(EchoBrain::new(), 100);

        let start = tokio::time::Instant::now();
        let outcome = brain
            .complete(CompletionRequest::new("p", "test", "user:1"))
            .await;

        assert_eq!(outcome.text(), "test");
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_brain_name() {
        let brain = DelayedBrain::with_millis(EchoBrain::new(), 0);
        assert_eq!(brain.name(), "DelayedBrain");
    }
}
