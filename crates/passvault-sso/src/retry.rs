//! Bounded retries for identity service calls.
//!
//! Only `NotFound`, `Aborted` and `DeadlineExceeded` are retried. Every
//! attempt runs under its own timeout; an attempt that overruns counts as
//! `DeadlineExceeded`. Retries back off exponentially with 0–50% jitter.

use passvault_core::SsoConfig;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tonic::{Code, Status};

const INITIAL_BACKOFF: Duration = Duration::from_millis(50);
const MAX_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &SsoConfig) -> Self {
        Self {
            max_attempts: config.retries_count.max(1),
            attempt_timeout: config.timeout,
            initial_backoff: INITIAL_BACKOFF,
            max_backoff: MAX_BACKOFF,
        }
    }
}

/// Whether a failed attempt with this code may be retried.
pub fn is_retryable(code: Code) -> bool {
    matches!(code, Code::NotFound | Code::Aborted | Code::DeadlineExceeded)
}

/// Run `operation` until it succeeds, fails with a non-retryable status, or
/// the retry budget is spent. Returns the last status on failure.
#[tracing::instrument(skip(policy, operation), fields(max_attempts = policy.max_attempts))]
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, Status>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Status>>,
{
    let mut attempt = 1;
    loop {
        let outcome = match tokio::time::timeout(policy.attempt_timeout, operation()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(Status::deadline_exceeded("attempt timed out")),
        };

        match outcome {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(
                        operation = operation_name,
                        attempt,
                        "call succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(status) if is_retryable(status.code()) && attempt < policy.max_attempts => {
                let delay = compute_backoff(policy, attempt - 1);
                tracing::debug!(
                    operation = operation_name,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    code = ?status.code(),
                    "retryable status, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(status) => return Err(status),
        }
    }
}

fn compute_backoff(policy: &RetryPolicy, attempt: u32) -> Duration {
    let base = policy
        .initial_backoff
        .saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX));
    let capped = base.min(policy.max_backoff);

    let jitter_range = capped.as_millis() as u64 / 2;
    if jitter_range > 0 {
        let jitter = rand::rng().random_range(0..=jitter_range);
        capped + Duration::from_millis(jitter)
    } else {
        capped
    }
}
