//! Retry configuration from TOML (`[retry]` section)

use super::issue::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tuned_application::BackoffPolicy;

/// Backoff settings for remote calls.
///
/// # Example
///
/// ```toml
/// [retry]
/// retries = 5
/// base_delay_ms = 500
/// jitter_ms = 250
/// ```
/// Attempts per call unless configured.
///
/// Lower than [`BackoffPolicy::default`] so a rejected API key fails within
/// a few minutes instead of hours.
pub const DEFAULT_RETRIES: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Total attempts per call.
    pub retries: u32,
    /// Delay before the second attempt, doubled after each failure.
    pub base_delay_ms: u64,
    /// Upper bound of the random delay added to each pause.
    pub jitter_ms: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = BackoffPolicy::default();
        Self {
            retries: DEFAULT_RETRIES,
            base_delay_ms: policy.base_delay.as_millis() as u64,
            jitter_ms: policy.jitter.as_millis() as u64,
        }
    }
}

impl FileRetryConfig {
    /// Convert to a [`BackoffPolicy`], returning validation issues.
    pub fn to_policy(&self) -> (BackoffPolicy, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        if self.retries == 0 {
            issues.push(ConfigIssue::new(
                "retry.retries",
                "0 is treated as a single attempt",
            ));
        }

        let policy = BackoffPolicy::new(self.retries, Duration::from_millis(self.base_delay_ms))
            .with_jitter(Duration::from_millis(self.jitter_ms));
        (policy, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds_attempts_and_keeps_policy_delays() {
        let (policy, issues) = FileRetryConfig::default().to_policy();
        assert_eq!(policy.max_attempts(), DEFAULT_RETRIES);
        assert_eq!(
            policy,
            BackoffPolicy::default().with_retries(DEFAULT_RETRIES)
        );
        assert!(issues.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_gives_up_on_rejected_key() {
        let (policy, _) = FileRetryConfig::default().to_policy();
        let start = tokio::time::Instant::now();
        let mut attempts = 0;

        let result: Result<(), &str> = policy
            .run(|| {
                attempts += 1;
                async { Err("unauthorized") }
            })
            .await;

        assert_eq!(result, Err("unauthorized"));
        assert_eq!(attempts, DEFAULT_RETRIES);
        assert!(start.elapsed() < std::time::Duration::from_secs(300));
    }

    #[test]
    fn test_zero_retries_warns() {
        let config = FileRetryConfig {
            retries: 0,
            ..Default::default()
        };
        let (policy, issues) = config.to_policy();
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(issues.len(), 1);
    }
}
