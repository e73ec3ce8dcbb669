//! Echo brain implementation - answers with the user text.

use std::sync::{Arc, Mutex};

use brain_core::{async_trait, Brain, CompletionOutcome, CompletionRequest};

/// A brain that echoes the user turn back as the answer.
///
/// Every request is recorded; clones share the record, so a test can keep a
/// handle while the orchestrator owns another.
#[derive(Debug, Clone, Default)]
pub struct EchoBrain {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl EchoBrain {
    /// Create a new EchoBrain with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoBrain with a custom prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_brain::EchoBrain;
    ///
    /// let brain = EchoBrain::with_prefix("Echo: ");
    /// // Will answer with "Echo: <user text>"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Number of completions requested.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Brain for EchoBrain {
    async fn complete(&self, request: CompletionRequest) -> CompletionOutcome {
        let text = match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, request.user_text),
            None => request.user_text.clone(),
        };

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        CompletionOutcome::Answer(text)
    }

    fn name(&self) -> &str {
        "EchoBrain"
    }
}
