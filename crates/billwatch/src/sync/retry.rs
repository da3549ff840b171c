//! Bounded retries with per-attempt timeouts around upstream calls.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use billwatch_core::retry::RetryPolicy;
use billwatch_core::upstream::{SummaryError, UpstreamError};

/// Failures that know whether another attempt could succeed.
pub trait Transient {
    fn is_transient(&self) -> bool;

    /// The failure reported when an attempt exceeds its timeout.
    fn timed_out(after: Duration) -> Self;
}

impl Transient for UpstreamError {
    fn is_transient(&self) -> bool {
        UpstreamError::is_transient(self)
    }

    fn timed_out(after: Duration) -> Self {
        UpstreamError::Unavailable(format!("timed out after {}s", after.as_secs()))
    }
}

impl Transient for SummaryError {
    fn is_transient(&self) -> bool {
        SummaryError::is_transient(self)
    }

    fn timed_out(after: Duration) -> Self {
        SummaryError::ModelUnavailable(format!("timed out after {}s", after.as_secs()))
    }
}

/// Runs `call` until it succeeds, fails terminally or runs out of attempts.
///
/// Each attempt is bounded by `timeout`; exceeding it counts as a transient
/// failure.
pub async fn call_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    timeout: Duration,
    operation: &'static str,
    mut call: F,
) -> Result<T, E>
where
    E: Transient + Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        let result = match tokio::time::timeout(timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(E::timed_out(timeout)),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(error) if error.is_transient() && attempt + 1 < attempts => {
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    operation,
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Upstream call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
