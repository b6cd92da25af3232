//! Backoff between inference attempts
//!
//! A transient backend failure (rate limit, dropped connection) is retried a
//! bounded number of times before the pipeline falls back to its defaults.

use std::{future::Future, time::Duration};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Backoff settings, loaded from the `[retry]` config section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Retries after the first call; 0 disables retrying
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_true")]
    pub jitter_enabled: bool,

    /// Fraction of the delay used as +/- jitter
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

const fn default_initial_delay() -> u64 {
    500
}

const fn default_max_delay() -> u64 {
    8_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_true() -> bool {
    true
}

const fn default_jitter_factor() -> f64 {
    0.1
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            max_retries: default_max_retries(),
            jitter_enabled: default_true(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub const fn new(
        initial_delay_ms: u64,
        max_delay_ms: u64,
        multiplier: f64,
        max_retries: u32,
    ) -> Self {
        Self {
            initial_delay_ms,
            max_delay_ms,
            multiplier,
            max_retries,
            jitter_enabled: true,
            jitter_factor: 0.1,
        }
    }

    /// A single attempt, never retried
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(0, 0, 1.0, 0)
    }

    /// Deterministic delays, for tests
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter_enabled = false;
        self
    }

    /// `initial_delay_ms * multiplier^retry`, capped at `max_delay_ms`
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        let millis = ((self.initial_delay_ms as f64) * self.multiplier.powi(retry as i32))
            .min(self.max_delay_ms as f64);

        if !self.jitter_enabled || millis <= 0.0 {
            return Duration::from_millis(millis as u64);
        }

        let spread = millis * self.jitter_factor;
        let jittered = millis + rand::rng().random_range(-spread..=spread);
        Duration::from_millis(jittered.max(0.0) as u64)
    }
}

/// Errors that know whether another attempt could succeed
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for application::ApplicationError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Final result of a retried operation and how many calls it took
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    /// Calls made, including the first one
    pub attempts: u32,
}

/// Run `operation` until it succeeds, fails permanently, or the budget in
/// `config` is spent
#[allow(clippy::cast_possible_truncation)]
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let mut retries = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => {
                if retries > 0 {
                    debug!(retries, "Inference call recovered");
                }
                return RetryOutcome {
                    result: Ok(value),
                    attempts: retries + 1,
                };
            },
            Err(err) => err,
        };

        if !err.is_retryable() || retries >= config.max_retries {
            if err.is_retryable() {
                warn!(retries, error = %err, "Retry budget exhausted");
            }
            return RetryOutcome {
                result: Err(err),
                attempts: retries + 1,
            };
        }

        let delay = config.delay_for_attempt(retries);
        warn!(
            retry = retries + 1,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Inference call failed, backing off"
        );
        tokio::time::sleep(delay).await;
        retries += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    use application::ApplicationError;

    use super::*;

    #[derive(Debug, Clone)]
    struct TestError {
        message: String,
        retryable: bool,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig::new(1, 5, 2.0, max_retries).without_jitter()
    }

    #[test]
    fn config_default_values() {
        let config = RetryConfig::default();
        assert_eq!(config.initial_delay_ms, 500);
        assert_eq!(config.max_delay_ms, 8_000);
        assert!((config.multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.max_retries, 2);
        assert!(config.jitter_enabled);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: RetryConfig = serde_json::from_str(r#"{"max_retries": 5}"#).unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.initial_delay_ms, 500);
    }

    #[test]
    fn disabled_never_retries() {
        let config = RetryConfig::disabled();
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.delay_for_attempt(3), Duration::ZERO);
    }

    #[test]
    fn delay_grows_exponentially_and_caps() {
        let config = RetryConfig::new(100, 1000, 2.0, 5).without_jitter();
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(config.delay_for_attempt(10), Duration::from_millis(1000));
    }

    #[test]
    fn jitter_stays_within_range() {
        let config = RetryConfig::new(1000, 10_000, 2.0, 3);
        for _ in 0..50 {
            let delay = config.delay_for_attempt(0).as_millis();
            assert!((900..=1100).contains(&delay));
        }
    }

    #[test]
    fn application_error_retryability() {
        assert!(Retryable::is_retryable(&ApplicationError::RateLimited));
        assert!(Retryable::is_retryable(&ApplicationError::ExternalService(
            "down".to_string()
        )));
        assert!(!Retryable::is_retryable(&ApplicationError::Inference(
            "bad".to_string()
        )));
    }

    #[tokio::test]
    async fn disabled_config_makes_one_call() {
        let counter = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&counter);

        let outcome = with_retry(&RetryConfig::disabled(), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(ApplicationError::RateLimited)
            }
        })
        .await;

        assert!(matches!(outcome.result, Err(ApplicationError::RateLimited)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn succeeds_first_try() {
        let outcome = with_retry(&fast_config(3), || async { Ok::<_, TestError>(42) }).await;
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.result.unwrap(), 42);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let counter = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&counter);

        let result = with_retry(&fast_config(3), || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(TestError {
                        message: "transient".to_string(),
                        retryable: true,
                    })
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.result.unwrap(), "done");
        assert_eq!(result.attempts, 3);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_after_max_retries() {
        let counter = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&counter);

        let result = with_retry(&fast_config(2), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError {
                    message: "still down".to_string(),
                    retryable: true,
                })
            }
        })
        .await;

        assert_eq!(result.result.unwrap_err().message, "still down");
        assert_eq!(result.attempts, 3);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_fails_immediately() {
        let counter = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&counter);

        let result = with_retry(&fast_config(5), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError {
                    message: "bad request".to_string(),
                    retryable: false,
                })
            }
        })
        .await;

        assert!(result.result.is_err());
        assert_eq!(result.attempts, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
