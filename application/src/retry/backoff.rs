//! Exponential backoff with jitter.
//!
//! [`BackoffPolicy::run`] attempts an async operation up to `retries` times
//! in total. After the k-th failed attempt (k starting at 1) it sleeps
//!
//! ```text
//! base_delay * 2^(k-1) + jitter * U[0, 1)
//! ```
//!
//! so with the defaults the first pause is between one and two seconds.
//! `retries = 0` behaves like `retries = 1`: the operation always runs once.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Upper bound on the doubling exponent; keeps delay arithmetic finite.
const MAX_EXPONENT: u32 = 20;

/// Retry policy for remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Total number of attempts (0 is treated as 1).
    pub retries: u32,
    /// Delay before the second attempt, doubled for each later one.
    pub base_delay: Duration,
    /// Upper bound of the uniform random jitter added to every delay.
    pub jitter: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            retries: 64,
            base_delay: Duration::from_secs(1),
            jitter: Duration::from_secs(1),
        }
    }
}

impl BackoffPolicy {
    pub fn new(retries: u32, base_delay: Duration) -> Self {
        Self {
            retries,
            base_delay,
            ..Self::default()
        }
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            retries: 1,
            base_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Attempts actually made before giving up.
    pub fn max_attempts(&self) -> u32 {
        self.retries.max(1)
    }

    /// Delay after `failed_attempts` failures, given a jitter sample in `[0, 1)`.
    pub fn delay_for(&self, failed_attempts: u32, jitter_sample: f64) -> Duration {
        let exponent = failed_attempts.saturating_sub(1).min(MAX_EXPONENT);
        let backoff = self.base_delay.saturating_mul(1u32 << exponent);
        backoff.saturating_add(self.jitter.mul_f64(jitter_sample.clamp(0.0, 1.0)))
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// The last error is returned unchanged. Sleeping yields to the runtime,
    /// and dropping the returned future stops the loop.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Succeeded on attempt {}/{}", attempt, max_attempts);
                    }
                    return Ok(value);
                }
                Err(e) if attempt >= max_attempts => {
                    warn!("Giving up after {} attempt(s): {}", attempt, e);
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for(attempt, rand::random::<f64>());
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Attempt failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Like [`run`](Self::run), but returns `None` once `token` is cancelled.
    pub async fn run_until_cancelled<T, E, F, Fut>(
        &self,
        op: F,
        token: &CancellationToken,
    ) -> Option<Result<T, E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        tokio::select! {
            _ = token.cancelled() => {
                debug!("Retry loop cancelled");
                None
            }
            result = self.run(op) => Some(result),
        }
    }
}
