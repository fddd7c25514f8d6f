//! Caller-side retry policy
//!
//! `ApiClient::request` makes exactly one attempt. Callers that want retries
//! wrap it with [`run`]:
//!
//! - `Network`, `RateLimited` and 5xx `UpstreamStatus` back off exponentially
//!   (a `Retry-After` hint replaces the computed delay, still capped)
//! - `Unauthorized` is retried once, immediately; the executor has already
//!   dropped the rejected token so the retry fetches a new one
//! - everything else is returned as is

use std::future::Future;
use std::time::Duration;

use super::error::{ApiError, ApiResult};

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts for retryable failures, including the first
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries retryable failures
    ///
    /// A rejected token is still retried once.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn backoff_delay(&self, retry: u32, hint: Option<Duration>) -> Duration {
        let delay = hint.unwrap_or_else(|| {
            let shift = retry.saturating_sub(1).min(16);
            self.base_backoff.saturating_mul(1u32 << shift)
        });
        delay.min(self.max_backoff)
    }
}

/// Runs `operation` under `policy`
pub async fn run<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut attempt = 1;
    let mut reauthorized = false;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(ApiError::Unauthorized) if !reauthorized => {
                tracing::info!("IGDB rejected the token, retrying once with a fresh one");
                reauthorized = true;
            }
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.backoff_delay(attempt, e.retry_after());
                tracing::info!(
                    "IGDB request failed ({}), retry {} of {} in {:?}",
                    e,
                    attempt,
                    policy.max_attempts - 1,
                    delay
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
