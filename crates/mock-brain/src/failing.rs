//! Failing brain implementation - always falls back.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use brain_core::{async_trait, Brain, CompletionOutcome, CompletionRequest, FailureKind};

/// A brain that never answers.
#[derive(Debug, Clone)]
pub struct FailingBrain {
    kind: FailureKind,
    calls: Arc<AtomicUsize>,
}

impl FailingBrain {
    /// Create a brain that always falls back with `kind`.
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of completions requested.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn complete(&self, _request: CompletionRequest) -> CompletionOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CompletionOutcome::Fallback(self.kind)
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }
}
