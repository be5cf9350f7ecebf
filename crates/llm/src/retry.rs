//! Resilient remote calls
//!
//! Wraps a fallible async operation in a bounded, fixed-backoff retry loop.
//! Only errors the policy classifies as retryable (rate-limit / quota
//! exhaustion by default) are retried; everything else propagates on the
//! first occurrence. When every attempt is exhausted the caller gets
//! [`CallOutcome::Exhausted`] instead of an error, so callers can render a
//! dedicated "service busy" response.
//!
//! ```rust,ignore
//! let caller = ResilientCaller::new(RetryPolicy::default());
//! match caller.call(|| model.generate(&prompt)).await? {
//!     CallOutcome::Completed { value, .. } => value,
//!     CallOutcome::Exhausted { .. } => "busy".to_string(),
//! }
//! ```

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use voxpedia_config::constants::retry;
use voxpedia_config::RetryConfig;
use voxpedia_core::{Error, Result};

/// Retry policy: attempt bound, fixed wait and retryable-error classifier
#[derive(Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Wait between consecutive attempts
    pub backoff: Duration,
    /// Decides whether an error is worth another attempt
    pub retry_on: fn(&Error) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            backoff: Duration::from_secs(retry::BACKOFF_SECS),
            retry_on: Error::is_resource_exhausted,
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
            ..Default::default()
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.backoff())
    }

    #[must_use]
    pub fn with_classifier(mut self, retry_on: fn(&Error) -> bool) -> Self {
        self.retry_on = retry_on;
        self
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Suspends the current task between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl<T: Sleeper + ?Sized> Sleeper for std::sync::Arc<T> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

/// Result of a resilient call
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    /// The operation succeeded on attempt number `attempts`
    Completed { value: T, attempts: u32 },
    /// Every attempt failed with a retryable error
    Exhausted { attempts: u32 },
}

impl<T> CallOutcome<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            CallOutcome::Completed { attempts, .. } | CallOutcome::Exhausted { attempts } => {
                *attempts
            }
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            CallOutcome::Completed { value, .. } => Some(value),
            CallOutcome::Exhausted { .. } => None,
        }
    }
}

/// Executes operations under a [`RetryPolicy`]
pub struct ResilientCaller<S = TokioSleeper> {
    policy: RetryPolicy,
    sleeper: S,
}

impl ResilientCaller<TokioSleeper> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_sleeper(policy, TokioSleeper)
    }
}

impl<S: Sleeper> ResilientCaller<S> {
    pub fn with_sleeper(policy: RetryPolicy, sleeper: S) -> Self {
        Self { policy, sleeper }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt bound is reached. No wait follows the final attempt.
    pub async fn call<T, F, Fut>(&self, mut op: F) -> Result<CallOutcome<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(attempt, "Call succeeded after retry");
                    }
                    return Ok(CallOutcome::Completed {
                        value,
                        attempts: attempt,
                    });
                }
                Err(err) if (self.policy.retry_on)(&err) => {
                    if attempt >= max_attempts {
                        tracing::warn!(
                            attempts = attempt,
                            error = %err,
                            "Retry attempts exhausted"
                        );
                        return Ok(CallOutcome::Exhausted { attempts: attempt });
                    }

                    tracing::warn!(
                        attempt,
                        max_attempts,
                        backoff_secs = self.policy.backoff.as_secs_f64(),
                        error = %err,
                        "Retryable failure, backing off"
                    );
                    self.sleeper.sleep(self.policy.backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Default, Clone)]
    struct RecordingSleeper {
        waits: Arc<Mutex<Vec<Duration>>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.waits.lock().push(duration);
        }
    }

    fn caller(sleeper: RecordingSleeper) -> ResilientCaller<RecordingSleeper> {
        ResilientCaller::with_sleeper(RetryPolicy::default(), sleeper)
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let sleeper = RecordingSleeper::default();
        let outcome = caller(sleeper.clone())
            .call(|| async { Ok::<_, Error>("answer") })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CallOutcome::Completed {
                value: "answer",
                attempts: 1
            }
        );
        assert!(sleeper.waits.lock().is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_after_three_attempts() {
        let sleeper = RecordingSleeper::default();
        let calls = AtomicU32::new(0);
        let calls = &calls;

        let outcome: CallOutcome<String> = caller(sleeper.clone())
            .call(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::ResourceExhausted("429".into()))
            })
            .await
            .unwrap();

        assert_eq!(outcome, CallOutcome::Exhausted { attempts: 3 });
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let waits = sleeper.waits.lock();
        assert_eq!(waits.len(), 2);
        assert!(waits.iter().all(|w| *w >= Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_recovers_after_one_retry() {
        let sleeper = RecordingSleeper::default();
        let calls = AtomicU32::new(0);
        let calls = &calls;

        let outcome = caller(sleeper.clone())
            .call(|| async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(Error::ResourceExhausted("quota".into()))
                } else {
                    Ok(42)
                }
            })
            .await
            .unwrap();

        assert_eq!(outcome.attempts(), 2);
        assert_eq!(outcome.into_value(), Some(42));
        assert_eq!(sleeper.waits.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_non_retryable_propagates_immediately() {
        let sleeper = RecordingSleeper::default();
        let calls = AtomicU32::new(0);
        let calls = &calls;

        let result: Result<CallOutcome<()>> = caller(sleeper.clone())
            .call(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::Llm("bad request".into()))
            })
            .await;

        assert_eq!(result, Err(Error::Llm("bad request".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sleeper.waits.lock().is_empty());
    }

    #[tokio::test]
    async fn test_zero_attempts_still_calls_once() {
        let sleeper = RecordingSleeper::default();
        let caller = ResilientCaller::with_sleeper(
            RetryPolicy::new(0, Duration::from_secs(1)),
            sleeper.clone(),
        );

        let outcome: CallOutcome<()> = caller
            .call(|| async { Err(Error::ResourceExhausted("x".into())) })
            .await
            .unwrap();

        assert_eq!(outcome, CallOutcome::Exhausted { attempts: 1 });
        assert!(sleeper.waits.lock().is_empty());
    }

    #[tokio::test]
    async fn test_custom_classifier() {
        let caller = ResilientCaller::with_sleeper(
            RetryPolicy::new(2, Duration::ZERO).with_classifier(|e| matches!(e, Error::Timeout(_))),
            RecordingSleeper::default(),
        );

        let outcome: CallOutcome<()> = caller
            .call(|| async { Err(Error::Timeout(100)) })
            .await
            .unwrap();
        assert_eq!(outcome, CallOutcome::Exhausted { attempts: 2 });

        let result: Result<CallOutcome<()>> = caller
            .call(|| async { Err(Error::ResourceExhausted("x".into())) })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_waits_backoff() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(60)).await;
        assert!(start.elapsed() >= Duration::from_secs(60));
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from_config(&RetryConfig {
            max_attempts: 5,
            backoff_secs: 2,
        });
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.backoff, Duration::from_secs(2));
        assert!((policy.retry_on)(&Error::ResourceExhausted("x".into())));
    }
}
