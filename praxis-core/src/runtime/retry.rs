//! Classification-driven retry with backoff
//!
//! Retries transient failures up to an attempt budget. Rate limits wait a
//! flat 30 seconds; everything else backs off exponentially (1s, 2s, 4s,
//! ...). The retry predicate lives in [`classify`](super::classify):
//! non-retryable and auth-class failures surface immediately.

use super::classify::should_retry;
use crate::tools::{ToolError, ToolErrorCode, ToolResult};
use std::future::Future;
use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempt budget including the first call
    pub max_attempts: usize,
    /// Base delay for exponential backoff
    pub base_delay: Duration,
    /// Flat delay applied to rate-limited failures
    pub rate_limit_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            rate_limit_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    /// Builder: set the base backoff delay
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Builder: set the flat rate-limit delay
    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    /// Delay before the retry that follows `attempt` (1-indexed).
    pub fn delay_for(&self, error: &ToolError, attempt: usize) -> Duration {
        if error.code == ToolErrorCode::RateLimited {
            return self.rate_limit_delay;
        }
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1) as u32);
        self.base_delay.saturating_mul(factor)
    }
}

/// Execute an operation with retries.
///
/// `notify` fires once per scheduled retry (before the sleep) with the
/// attempt number that just failed and its error, for observability.
/// Returns the first success or the last failure once the budget is spent.
pub async fn with_retry<T, F, Fut, N>(
    policy: &RetryPolicy,
    mut notify: N,
    operation: F,
) -> ToolResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = ToolResult<T>>,
    N: FnMut(usize, &ToolError),
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= policy.max_attempts || !should_retry(&error) {
                    return Err(error);
                }
                notify(attempt, &error);
                tokio::time::sleep(policy.delay_for(&error, attempt)).await;
                attempt += 1;
            }
        }
    }
}
