//! Retry policy.
//!
//! Wraps a single request attempt and replays it on transient failures
//! ([`Error::is_retryable`]). The same policy drives the async client
//! (tokio timer) and the blocking client (thread sleep).

use crate::config::EspnConfig;
use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// How to proceed after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Retry { delay: Duration },
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            min_delay,
            max_delay: max_delay.max(min_delay),
        }
    }

    pub fn from_config(config: &EspnConfig) -> Self {
        Self::new(config.max_retries, config.retry_backoff, config.max_backoff)
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based): `min_delay * 2^(retry-1)`,
    /// clamped to `[min_delay, max_delay]`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let exp = retry.saturating_sub(1).min(31);
        self.min_delay
            .checked_mul(1u32 << exp)
            .unwrap_or(self.max_delay)
            .clamp(self.min_delay, self.max_delay)
    }

    /// Decide what follows failed attempt number `attempt` (1-based).
    ///
    /// A `Retry-After` hint on a 429 replaces the computed delay, capped at
    /// `max_delay`.
    pub fn decide(&self, attempt: u32, error: &Error) -> Decision {
        if attempt >= self.max_attempts() || !error.is_retryable() {
            return Decision::Fail;
        }
        let delay = match error {
            Error::RateLimited {
                retry_after: Some(hint),
                ..
            } => (*hint).min(self.max_delay),
            _ => self.backoff(attempt),
        };
        Decision::Retry { delay }
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => match self.decide(attempt, &err) {
                    Decision::Retry { delay } => {
                        self.log_retry(operation, attempt, delay, &err);
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    Decision::Fail => {
                        self.log_failure(operation, attempt, &err);
                        return Err(err);
                    }
                },
            }
        }
    }

    /// Blocking counterpart of [`RetryPolicy::run`].
    pub fn run_blocking<T, F>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) => match self.decide(attempt, &err) {
                    Decision::Retry { delay } => {
                        self.log_retry(operation, attempt, delay, &err);
                        std::thread::sleep(delay);
                        attempt += 1;
                    }
                    Decision::Fail => {
                        self.log_failure(operation, attempt, &err);
                        return Err(err);
                    }
                },
            }
        }
    }

    fn log_retry(&self, operation: &str, attempt: u32, delay: Duration, err: &Error) {
        warn!(
            operation,
            attempt,
            max_attempts = self.max_attempts(),
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "retrying_request"
        );
    }

    fn log_failure(&self, operation: &str, attempt: u32, err: &Error) {
        // Only worth a dedicated event once retries were actually spent.
        if attempt > 1 {
            error!(
                operation,
                attempts = attempt,
                retries = self.max_retries,
                error = %err,
                "request_failed_after_retries"
            );
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&EspnConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn server_error() -> Error {
        Error::Remote {
            status: 503,
            url: "https://example.test".into(),
            body: String::new(),
        }
    }

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_millis(1), Duration::from_millis(5))
    }

    #[test]
    fn from_config_uses_config_values() {
        let config = EspnConfig::default()
            .with_max_retries(5)
            .with_retry_backoff(Duration::from_secs(2));
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_attempts(), 6);
        assert_eq!(policy.min_delay, Duration::from_secs(2));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(10, Duration::from_secs(1), Duration::from_secs(10));
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(3), Duration::from_secs(4));
        assert_eq!(policy.backoff(4), Duration::from_secs(8));
        assert_eq!(policy.backoff(5), Duration::from_secs(10));
        assert_eq!(policy.backoff(40), Duration::from_secs(10));
    }

    #[test]
    fn decide_respects_attempt_budget() {
        let policy = fast(2);
        assert!(matches!(policy.decide(1, &server_error()), Decision::Retry { .. }));
        assert!(matches!(policy.decide(2, &server_error()), Decision::Retry { .. }));
        assert_eq!(policy.decide(3, &server_error()), Decision::Fail);
    }

    #[test]
    fn decide_never_retries_permanent_errors() {
        let policy = fast(5);
        let not_found = Error::NotFound { url: String::new() };
        assert_eq!(policy.decide(1, &not_found), Decision::Fail);
        let bad_request = Error::Remote {
            status: 400,
            url: String::new(),
            body: String::new(),
        };
        assert_eq!(policy.decide(1, &bad_request), Decision::Fail);
    }

    #[test]
    fn retry_after_hint_overrides_backoff() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100), Duration::from_secs(2));
        let limited = |secs| Error::RateLimited {
            url: String::new(),
            retry_after: Some(Duration::from_secs(secs)),
        };
        assert_eq!(
            policy.decide(1, &limited(1)),
            Decision::Retry {
                delay: Duration::from_secs(1)
            }
        );
        assert_eq!(
            policy.decide(1, &limited(60)),
            Decision::Retry {
                delay: Duration::from_secs(2)
            }
        );
    }

    #[test]
    fn zero_retries_means_single_attempt() {
        let calls = Cell::new(0);
        let result: Result<()> = fast(0).run_blocking("test", |_| {
            calls.set(calls.get() + 1);
            Err(server_error())
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn blocking_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let result = fast(3).run_blocking("test", |attempt| {
            calls.set(calls.get() + 1);
            if attempt < 3 {
                Err(server_error())
            } else {
                Ok("ok")
            }
        });
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn blocking_returns_last_error_when_exhausted() {
        let calls = Cell::new(0);
        let err = fast(2)
            .run_blocking("test", |_| -> Result<()> {
                calls.set(calls.get() + 1);
                Err(server_error())
            })
            .unwrap_err();
        assert_eq!(calls.get(), 3);
        assert_eq!(err.status_code(), Some(503));
    }

    #[tokio::test]
    async fn async_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let result = fast(3)
            .run("test", |attempt| {
                calls.set(calls.get() + 1);
                async move {
                    if attempt < 3 {
                        Err(server_error())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn async_stops_on_permanent_error() {
        let calls = Cell::new(0);
        let err = fast(3)
            .run("test", |_| {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(Error::NotFound { url: "u".into() }) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(calls.get(), 1);
    }
}
