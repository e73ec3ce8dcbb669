//! Rate-limit backoff.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Exponential backoff for rate-limited requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included.
    pub max_attempts: u32,
    /// Delay after the first rate-limited attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy. Zero attempts is raised to one.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay after the given zero-based attempt: `base * 2^attempt`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor)
    }
}

/// Something that can wait.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

#[async_trait]
impl<S: Sleeper + ?Sized> Sleeper for Arc<S> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
