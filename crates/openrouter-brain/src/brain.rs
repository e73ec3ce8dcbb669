//! OpenRouterBrain implementation.

use brain_core::{
    async_trait, preview, Brain, BrainError, CompletionOutcome, CompletionRequest, FailureKind,
};
use tracing::{debug, error, info, warn};

use crate::api_types::{
    describe_error_body, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
};
use crate::config::OpenRouterConfig;
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::transport::{ChatTransport, RawResponse, ReqwestTransport, TransportError};

/// A brain that asks an OpenAI-compatible chat-completions endpoint.
///
/// Each call is stateless: history and persona arrive in the
/// [`CompletionRequest`]. Rate limiting (429) is retried with exponential
/// backoff; every other failure is classified on the spot and surfaces as a
/// [`CompletionOutcome::Fallback`].
pub struct OpenRouterBrain<T = ReqwestTransport, S = TokioSleeper> {
    transport: T,
    sleeper: S,
    config: OpenRouterConfig,
    policy: RetryPolicy,
}

impl OpenRouterBrain {
    /// Create a brain that talks HTTP through `reqwest`.
    pub fn new(config: OpenRouterConfig) -> Result<Self, BrainError> {
        if config.api_key.is_empty() {
            return Err(BrainError::Configuration("API key is empty".to_string()));
        }

        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_parts(config, transport, TokioSleeper))
    }

    /// Create an OpenRouterBrain from environment variables.
    ///
    /// See [`OpenRouterConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(OpenRouterConfig::from_env()?)
    }
}

impl<T, S> OpenRouterBrain<T, S>
where
    T: ChatTransport,
    S: Sleeper,
{
    /// Assemble a brain from explicit transport and sleeper.
    pub fn with_parts(config: OpenRouterConfig, transport: T, sleeper: S) -> Self {
        let policy = RetryPolicy::new(config.max_attempts, config.backoff_base);

        info!(
            "OpenRouterBrain initialized with model: {}, attempts: {}, timeout: {:?}",
            config.model, policy.max_attempts, config.timeout
        );

        Self {
            transport,
            sleeper,
            config,
            policy,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    /// Get the retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Build the request body sent on every attempt.
    pub fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: request
                .messages()
                .into_iter()
                .map(ChatMessage::from)
                .collect(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    /// One attempt bounded by the configured ceiling.
    async fn attempt(&self, body: &ChatCompletionRequest) -> Result<RawResponse, TransportError> {
        match tokio::time::timeout(self.config.timeout, self.transport.send(body)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        }
    }
}

/// What to do with a response.
enum Verdict {
    Done(CompletionOutcome),
    Retry,
}

fn judge(response: &RawResponse) -> Verdict {
    match response.status {
        200 => match serde_json::from_str::<ChatCompletionResponse>(&response.body) {
            Ok(completion) => match completion.first_content() {
                Some(text) => Verdict::Done(CompletionOutcome::Answer(text.to_string())),
                None => {
                    warn!("Completion contained no text");
                    Verdict::Done(CompletionOutcome::Fallback(FailureKind::Upstream))
                }
            },
            Err(e) => {
                warn!("Failed to parse completion response: {}", e);
                Verdict::Done(CompletionOutcome::Fallback(FailureKind::Upstream))
            }
        },
        429 => Verdict::Retry,
        401 => {
            error!(
                "Completion API rejected credentials (401): {}",
                describe_error_body(&response.body)
            );
            Verdict::Done(CompletionOutcome::Fallback(FailureKind::Unauthorized))
        }
        400 => {
            error!(
                "Completion API rejected request (400): {}",
                describe_error_body(&response.body)
            );
            Verdict::Done(CompletionOutcome::Fallback(FailureKind::BadRequest))
        }
        status => {
            warn!(
                "Completion API error ({}): {}",
                status,
                describe_error_body(&response.body)
            );
            Verdict::Done(CompletionOutcome::Fallback(FailureKind::Upstream))
        }
    }
}

#[async_trait]
impl<T, S> Brain for OpenRouterBrain<T, S>
where
    T: ChatTransport,
    S: Sleeper,
{
    async fn complete(&self, request: CompletionRequest) -> CompletionOutcome {
        let body = self.build_request(&request);
        debug!(
            "Completing for {} with {} history turns: {}",
            request.principal_id,
            request.history.len(),
            preview(&request.user_text, 80)
        );

        for attempt in 0..self.policy.max_attempts {
            let response = match self.attempt(&body).await {
                Ok(response) => response,
                Err(TransportError::Timeout) => {
                    warn!(
                        "Completion for {} timed out after {:?} (attempt {})",
                        request.principal_id,
                        self.config.timeout,
                        attempt + 1
                    );
                    return CompletionOutcome::Fallback(FailureKind::Timeout);
                }
                Err(TransportError::Connection(e)) => {
                    warn!("Completion for {} failed: {}", request.principal_id, e);
                    return CompletionOutcome::Fallback(FailureKind::Upstream);
                }
            };

            match judge(&response) {
                Verdict::Done(outcome) => {
                    match &outcome {
                        CompletionOutcome::Answer(text) => info!(
                            "Completion for {} on attempt {}: {}",
                            request.principal_id,
                            attempt + 1,
                            preview(text, 80)
                        ),
                        CompletionOutcome::Fallback(kind) => info!(
                            "Completion for {} fell back: {}",
                            request.principal_id,
                            kind.as_str()
                        ),
                    }
                    return outcome;
                }
                Verdict::Retry => {
                    let delay = self.policy.delay_for_attempt(attempt);
                    warn!(
                        "Rate limited for {} (attempt {}/{}), sleeping {:?}",
                        request.principal_id,
                        attempt + 1,
                        self.policy.max_attempts,
                        delay
                    );
                    self.sleeper.sleep(delay).await;
                }
            }
        }

        warn!(
            "Giving up on {} after {} rate-limited attempts",
            request.principal_id, self.policy.max_attempts
        );
        CompletionOutcome::Fallback(FailureKind::RateLimited)
    }

    fn name(&self) -> &str {
        "OpenRouterBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use brain_core::HistoryMessage;

    /// Replays canned responses and records what was sent.
    #[derive(Default)]
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
        sent: Mutex<Vec<ChatCompletionRequest>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<RawResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn statuses(statuses: &[u16]) -> Arc<Self> {
            Self::new(
                statuses
                    .iter()
                    .map(|&status| {
                        let body = if status == 200 {
                            ok_body("answer")
                        } else {
                            r#"{"error":{"message":"nope"}}"#.to_string()
                        };
                        Ok(RawResponse::new(status, body))
                    })
                    .collect(),
            )
        }

        fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send(
            &self,
            request: &ChatCompletionRequest,
        ) -> Result<RawResponse, TransportError> {
            self.sent.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".into())))
        }
    }

    /// Never answers in time.
    struct SlowTransport;

    #[async_trait]
    impl ChatTransport for SlowTransport {
        async fn send(&self, _: &ChatCompletionRequest) -> Result<RawResponse, TransportError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(RawResponse::new(200, ok_body("too late")))
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        fn sleeps(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    fn ok_body(text: &str) -> String {
        serde_json::json!({
            "id": "gen-1",
            "model": "test",
            "choices": [{"message": {"role": "assistant", "content": text}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        })
        .to_string()
    }

    fn config() -> OpenRouterConfig {
        OpenRouterConfig::builder()
            .api_key("test-key")
            .model("test/model")
            .build()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new("persona", "Как дела?", "user:1")
    }

    fn brain<T: ChatTransport>(
        transport: T,
    ) -> (OpenRouterBrain<T, Arc<RecordingSleeper>>, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::default());
        let brain = OpenRouterBrain::with_parts(config(), transport, sleeper.clone());
        (brain, sleeper)
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let transport = ScriptedTransport::new(vec![Ok(RawResponse::new(200, ok_body("  Салам  ")))]);
        let (brain, sleeper) = brain(transport.clone());

        let outcome = brain.complete(request()).await;

        assert_eq!(outcome, CompletionOutcome::Answer("Салам".to_string()));
        assert_eq!(transport.calls(), 1);
        assert!(sleeper.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_then_success() {
        let transport = ScriptedTransport::statuses(&[429, 429, 200]);
        let (brain, sleeper) = brain(transport.clone());

        let outcome = brain.complete(request()).await;

        assert_eq!(outcome, CompletionOutcome::Answer("answer".to_string()));
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            sleeper.sleeps(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );

        // Every attempt carries the same payload.
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0], sent[1]);
        assert_eq!(sent[1], sent[2]);
    }

    #[tokio::test]
    async fn test_rate_limited_exhausted() {
        let transport = ScriptedTransport::statuses(&[429, 429, 429]);
        let (brain, sleeper) = brain(transport.clone());

        let outcome = brain.complete(request()).await;

        assert_eq!(outcome, CompletionOutcome::Fallback(FailureKind::RateLimited));
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            sleeper.sleeps(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
    }

    #[tokio::test]
    async fn test_unauthorized_not_retried() {
        let transport = ScriptedTransport::statuses(&[401, 200]);
        let (brain, sleeper) = brain(transport.clone());

        let outcome = brain.complete(request()).await;

        assert_eq!(outcome, CompletionOutcome::Fallback(FailureKind::Unauthorized));
        assert_eq!(transport.calls(), 1);
        assert!(sleeper.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_bad_request_and_server_error() {
        let (brain_400, _) = brain(ScriptedTransport::statuses(&[400]));
        assert_eq!(
            brain_400.complete(request()).await,
            CompletionOutcome::Fallback(FailureKind::BadRequest)
        );

        let transport = ScriptedTransport::statuses(&[503, 200]);
        let (brain_503, sleeper) = brain(transport.clone());
        assert_eq!(
            brain_503.complete(request()).await,
            CompletionOutcome::Fallback(FailureKind::Upstream)
        );
        assert_eq!(transport.calls(), 1);
        assert!(sleeper.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_and_empty_bodies_are_upstream() {
        let transport = ScriptedTransport::new(vec![
            Ok(RawResponse::new(200, "not json")),
            Ok(RawResponse::new(200, ok_body("   "))),
            Ok(RawResponse::new(200, r#"{"choices":[]}"#)),
        ]);
        let (brain, _) = brain(transport);

        for _ in 0..3 {
            assert_eq!(
                brain.complete(request()).await,
                CompletionOutcome::Fallback(FailureKind::Upstream)
            );
        }
    }

    #[tokio::test]
    async fn test_transport_errors() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError::Timeout),
            Err(TransportError::Connection("refused".to_string())),
        ]);
        let (brain, _) = brain(transport.clone());

        assert_eq!(
            brain.complete(request()).await,
            CompletionOutcome::Fallback(FailureKind::Timeout)
        );
        assert_eq!(
            brain.complete(request()).await,
            CompletionOutcome::Fallback(FailureKind::Upstream)
        );
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_upstream_times_out() {
        let sleeper = Arc::new(RecordingSleeper::default());
        let config = OpenRouterConfig::builder()
            .api_key("k")
            .timeout(Duration::from_millis(50))
            .build();
        let brain = OpenRouterBrain::with_parts(config, SlowTransport, sleeper.clone());

        let outcome = brain.complete(request()).await;

        assert_eq!(outcome, CompletionOutcome::Fallback(FailureKind::Timeout));
        assert!(sleeper.sleeps().is_empty());
    }

    #[test]
    fn test_build_request_layout() {
        let (brain, _) = brain(ScriptedTransport::new(Vec::new()));
        let request = CompletionRequest::new("persona", "now", "group:-5")
            .with_history(vec![HistoryMessage::user("q"), HistoryMessage::assistant("a")]);

        let body = brain.build_request(&request);

        assert_eq!(body.model, "test/model");
        assert_eq!(body.max_tokens, Some(150));
        let roles: Vec<_> = body.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(body.messages[0].content, "persona");
        assert_eq!(body.messages[3].content, "now");
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = OpenRouterBrain::new(OpenRouterConfig::default());
        assert!(matches!(result, Err(BrainError::Configuration(_))));
    }

    #[test]
    fn test_name() {
        let (brain, _) = brain(ScriptedTransport::new(Vec::new()));
        assert_eq!(brain.name(), "OpenRouterBrain");
    }
}
