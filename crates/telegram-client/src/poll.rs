//! Long-polling update stream.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use futures::stream::{self, Stream};
use tracing::{debug, error, info, warn};

use crate::client::TelegramClient;
use crate::types::Update;

/// Configuration for retrying failed polls.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of consecutive failures (None = infinite).
    pub max_retries: Option<u32>,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each retry.
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    /// Calculate delay for a given attempt number.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        if !delay_ms.is_finite() || delay_ms >= self.max_delay.as_millis() as f64 {
            return self.max_delay;
        }
        Duration::from_millis(delay_ms as u64)
    }

    /// Check if we should retry after the given number of attempts.
    pub fn should_retry(&self, attempts: u32) -> bool {
        self.max_retries.map_or(true, |max| attempts < max)
    }
}

/// A stream of incoming updates.
pub type UpdateStream = Pin<Box<dyn Stream<Item = Update> + Send>>;

struct PollState {
    client: TelegramClient,
    reconnect: ReconnectConfig,
    offset: Option<i64>,
    buffered: VecDeque<Update>,
    failures: u32,
}

impl PollState {
    /// Next update, polling as needed. `None` once retries are exhausted.
    async fn next(&mut self) -> Option<Update> {
        loop {
            if let Some(update) = self.buffered.pop_front() {
                return Some(update);
            }

            match self.client.get_updates(self.offset).await {
                Ok(updates) => {
                    if self.failures > 0 {
                        info!("Polling recovered after {} failures", self.failures);
                    }
                    self.failures = 0;
                    if let Some(last) = updates.last() {
                        self.offset = Some(last.update_id + 1);
                        debug!("Received {} updates, offset {}", updates.len(), last.update_id + 1);
                    }
                    self.buffered.extend(updates);
                }
                Err(e) => {
                    self.failures += 1;
                    if !self.reconnect.should_retry(self.failures) {
                        error!("Polling failed {} times, giving up: {}", self.failures, e);
                        return None;
                    }
                    let delay = self.reconnect.delay_for_attempt(self.failures - 1);
                    warn!(
                        "Polling failed (failures: {}), retrying in {:?}: {}",
                        self.failures, delay, e
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Subscribe to updates via `getUpdates` long polling.
///
/// Each update is yielded once; the offset advances past everything
/// received. Poll failures are retried with backoff, and the stream ends
/// only when `reconnect.max_retries` consecutive failures occur.
pub fn subscribe(client: TelegramClient, reconnect: ReconnectConfig) -> UpdateStream {
    info!("Starting long polling (timeout {}s)", client.config().poll_timeout_secs);

    let state = PollState {
        client,
        reconnect,
        offset: None,
        buffered: VecDeque::new(),
        failures: 0,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        let update = state.next().await?;
        Some((update, state))
    }))
}
