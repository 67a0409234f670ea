//! Fixed-delay retry for transport failures.
//!
//! The retry budget and delay live on the request descriptor; resubmission
//! is an explicit bounded loop so the termination condition is visually
//! obvious. Only transport-level failures are eligible (see
//! [`Error::is_retryable`]); authentication failures, application error
//! envelopes, and cancellations propagate immediately.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::error::{Error, Result};

/// Retry policy for HTTP requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of resubmissions.
    pub max_retries: u32,
    /// Fixed delay between resubmissions.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Creates a new retry policy.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Policy that never resubmits.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }
}

/// Executes an async operation, resubmitting on retryable failure until the
/// budget is exhausted.
///
/// The closure receives the 0-based attempt number. With a budget of `n` the
/// operation runs at most `n + 1` times; a budget of zero propagates the
/// first failure with no delay.
pub(crate) async fn execute_with_retry<F, Fut, T>(
    budget: u32,
    delay: Duration,
    operation: F,
) -> Result<T>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut remaining = budget;
    let mut attempt = 0;
    loop {
        match operation(attempt).await {
            Ok(response) => {
                debug!(attempt = attempt + 1, "request completed");
                return Ok(response);
            }
            Err(e) => {
                if !e.is_retryable() || remaining == 0 {
                    error!(
                        attempt = attempt + 1,
                        error = %e,
                        is_retryable = e.is_retryable(),
                        "request failed, not retrying"
                    );
                    return Err(e);
                }

                remaining -= 1;
                attempt += 1;
                warn!(
                    attempt,
                    remaining,
                    delay_ms = %delay.as_millis(),
                    error = %e,
                    "request failed, retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_retry_policy_none() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_retries, 0);
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let result = execute_with_retry(3, Duration::from_millis(1), |_| async {
            Ok::<_, Error>("ok")
        })
        .await;
        assert_eq!(result.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_budget_exhaustion_counts_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = execute_with_retry(2, Duration::from_millis(1), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::network("persistent failure")) }
        })
        .await;

        assert!(result.is_err());
        // 1 initial attempt + exactly 2 resubmissions.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_budget_propagates_immediately() {
        let calls = AtomicU32::new(0);
        let start = std::time::Instant::now();
        let result: Result<()> = execute_with_retry(0, Duration::from_secs(60), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::network("down")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // No delay interval may elapse when the budget is zero.
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_non_retryable_error_short_circuits() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = execute_with_retry(5, Duration::from_millis(1), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::authentication("token rejected")) }
        })
        .await;

        assert!(result.unwrap_err().as_authentication().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_within_budget() {
        let calls = AtomicU32::new(0);
        let result = execute_with_retry(3, Duration::from_millis(1), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(Error::network("flaky"))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
