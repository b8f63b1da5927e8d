//! Retry policy with exponential backoff

use rand::{RngExt, rng};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Retries used when `enable_retries` is called with zero
pub const DEFAULT_MAX_RETRIES: u32 = 4;

/// Backoff cap used when `enable_retries` is called with a zero interval
pub const DEFAULT_MAX_RETRY_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum retry attempts after the first request
    pub max_attempts: u32,

    /// Initial backoff duration
    pub initial_backoff: Duration,

    /// Maximum backoff duration
    pub max_backoff: Duration,

    /// Backoff multiplier
    pub multiplier: f64,

    /// Add jitter to prevent thundering herd
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_secs(1),
            max_backoff: DEFAULT_MAX_RETRY_INTERVAL,
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Build a policy from the two knobs exposed on services.
    ///
    /// Zero values fall back to the defaults. The initial backoff never
    /// exceeds the cap.
    pub fn with_limits(max_retries: u32, max_retry_interval: Duration) -> Self {
        let defaults = Self::default();
        let max_attempts = if max_retries == 0 {
            DEFAULT_MAX_RETRIES
        } else {
            max_retries
        };
        let max_backoff = if max_retry_interval.is_zero() {
            DEFAULT_MAX_RETRY_INTERVAL
        } else {
            max_retry_interval
        };

        Self {
            max_attempts,
            initial_backoff: defaults.initial_backoff.min(max_backoff),
            max_backoff,
            ..defaults
        }
    }

    /// Delay before retry number `attempt` (zero based), without jitter
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base = self.initial_backoff.as_secs_f64() * self.effective_multiplier().powi(exponent);
        Duration::try_from_secs_f64(base.min(self.max_backoff.as_secs_f64()))
            .unwrap_or(self.max_backoff)
    }

    /// Multipliers below one, or not finite, act as 1.0
    fn effective_multiplier(&self) -> f64 {
        if self.multiplier.is_finite() {
            self.multiplier.max(1.0)
        } else {
            1.0
        }
    }

    /// Sleep before retry number `attempt`, jitter included; never above `max_backoff`
    fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        // Retry-After from the service wins over the computed backoff
        if let Some(hint) = retry_after {
            return hint.min(self.max_backoff);
        }

        let delay = self.backoff_for(attempt);
        if !self.jitter {
            return delay;
        }
        let jitter = rng().random_range(0.0..0.3);
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let jitter_ms = (delay.as_millis() as f64 * jitter) as u64;
        (delay + Duration::from_millis(jitter_ms)).min(self.max_backoff)
    }

    /// Execute a function with retry logic
    pub async fn execute<F, Fut, T>(&self, mut f: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) if !e.should_retry() || attempt >= self.max_attempts => {
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for(attempt, e.retry_after_hint());
                    attempt += 1;
                    tracing::warn!("Attempt {} failed: {}", attempt, e);
                    tracing::debug!("Retry attempt {} after {:?} backoff", attempt, delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
