// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry with a fixed delay and a per-attempt timeout.
//!
//! Nothing here retries forever: a [`RetryPolicy`] makes at most
//! `retries + 1` attempts, each cut off by `attempt_timeout`, and only
//! transient errors (see [`NexaError::is_transient`]) earn another attempt.

use std::future::Future;
use std::time::Duration;

use nexa_core::NexaError;
use tracing::{debug, warn};

/// How an operation is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first.
    pub retries: u32,
    /// Pause between attempts.
    pub delay: Duration,
    /// Upper bound for a single attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            delay: Duration::from_millis(2000),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A single attempt with no retry.
    pub fn once(attempt_timeout: Duration) -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
            attempt_timeout,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// A timed-out attempt counts as [`NexaError::Timeout`], which is transient.
    /// The last error is returned when every attempt fails.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, NexaError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, NexaError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let outcome = match tokio::time::timeout(self.attempt_timeout, op(attempt)).await {
                Ok(result) => result,
                Err(_) => Err(NexaError::Timeout {
                    duration: self.attempt_timeout,
                }),
            };

            match outcome {
                Ok(value) => {
                    debug!(operation, attempt, "attempt succeeded");
                    return Ok(value);
                }
                Err(e) if e.is_transient() && attempt < self.max_attempts() => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts(),
                        error = %e,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => {
                    warn!(operation, attempt, error = %e, "giving up");
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn remote_err() -> NexaError {
        NexaError::Remote {
            message: "connection refused".into(),
            source: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let policy = RetryPolicy::default();
        let calls = Arc::new(AtomicU32::new(0));

        let started = tokio::time::Instant::now();
        let c = calls.clone();
        let result = policy
            .run("ping", move |attempt| {
                c.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(remote_err())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() >= Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let policy = RetryPolicy {
            retries: 2,
            delay: Duration::from_millis(100),
            attempt_timeout: Duration::from_secs(1),
        };
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<(), _> = policy
            .run("ping", move |_| {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err(remote_err()) }
            })
            .await;

        assert!(matches!(result, Err(NexaError::Remote { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_attempt_times_out() {
        let policy = RetryPolicy {
            retries: 1,
            delay: Duration::from_millis(10),
            attempt_timeout: Duration::from_secs(10),
        };

        let started = tokio::time::Instant::now();
        let result: Result<(), _> = policy
            .run("ping", |_| std::future::pending::<Result<(), NexaError>>())
            .await;

        assert!(matches!(result, Err(NexaError::Timeout { .. })));
        assert!(started.elapsed() >= Duration::from_millis(20_010));
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<(), _> = RetryPolicy::default()
            .run("auth", move |_| {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err(NexaError::Forbidden("wrong password".into())) }
            })
            .await;

        assert!(matches!(result, Err(NexaError::Forbidden(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn once_means_one_attempt() {
        assert_eq!(RetryPolicy::once(Duration::from_secs(1)).max_attempts(), 1);
    }
}
