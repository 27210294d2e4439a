//! Bounded exponential backoff for transient API failures

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Retry limits applied to individual API requests
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub backoff: Duration,
    /// Multiplier applied to the delay per retry
    pub backoff_factor: u32,
    /// Ceiling on any single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
            backoff_factor: 2,
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Policy that fails on the first error without retrying
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (zero-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let millis = (self.backoff.as_millis() as u64)
            .saturating_mul(u64::from(self.backoff_factor).saturating_pow(retry));
        Duration::from_millis(millis).min(self.max_backoff)
    }
}

/// Run `op`, retrying transient failures according to `policy`.
///
/// Non-transient errors, and the last transient error once the attempts
/// are spent, are returned to the caller unchanged. `what` names the
/// operation in retry logs.
pub async fn with_retry<T, Fut, F>(policy: &RetryPolicy, what: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!("{} failed ({}), retrying in {:?}", what, err, delay);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
