use std::future::Future;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::warn;

use crate::error::DbError;

/// Bounded retry schedule: capped exponential backoff with jitter and a total
/// wall-clock budget.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles each retry.
    pub base_delay: Duration,
    /// Cap for any single backoff delay.
    pub max_delay: Duration,
    /// Total wall-clock budget; no sleep is started that would exceed it.
    pub total_budget: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(3))
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay: Duration::from_secs(60),
            total_budget: Duration::from_secs(600),
        }
    }

    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    #[must_use]
    pub fn with_total_budget(mut self, total_budget: Duration) -> Self {
        self.total_budget = total_budget;
        self
    }

    /// Scheduled delay after the given 1-based failed attempt:
    /// `base_delay * 2^(attempt-1)`, capped at `max_delay`.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let factor = 1u32.checked_shl(exp).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Backoff delay with multiplicative jitter in `[0.5, 1.0]`, so a burst of
    /// clients does not hammer a recovering server in lockstep.
    #[must_use]
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        self.backoff_delay(attempt)
            .mul_f64(rand::rng().random_range(0.5..=1.0))
    }
}

/// Drive `op` until it succeeds, fails permanently, or the policy is spent.
///
/// Only errors classified retryable by [`DbError::is_retryable`] are retried;
/// a permanent error is returned after a single attempt. `op` is invoked at
/// least once even when `max_attempts` is zero.
pub async fn with_retries<T, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<T, DbError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbError>>,
{
    let started = Instant::now();
    let mut attempt = 1u32;
    loop {
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_retryable() {
            return Err(err);
        }
        if attempt >= policy.max_attempts {
            warn!("{what} failed after {attempt} attempts: {err}");
            return Err(err);
        }

        let delay = policy.jittered_delay(attempt);
        if started.elapsed() + delay > policy.total_budget {
            warn!(
                "{what} abandoned after {attempt} attempts, retry budget of {:?} exhausted: {err}",
                policy.total_budget
            );
            return Err(err);
        }

        warn!(
            "{what} failed (attempt {attempt}/{}), retrying in {delay:?}: {err}",
            policy.max_attempts
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::new(5, Duration::from_secs(3));
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(3));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(6));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(12));
        assert_eq!(policy.backoff_delay(4), Duration::from_secs(24));
    }

    #[test]
    fn backoff_is_capped_at_max_delay() {
        let policy = RetryPolicy::new(20, Duration::from_secs(3));
        assert_eq!(policy.backoff_delay(6), Duration::from_secs(60));
        assert_eq!(policy.backoff_delay(19), Duration::from_secs(60));
        // Large attempt numbers must not overflow the shift.
        assert_eq!(policy.backoff_delay(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn jitter_stays_within_half_to_full_delay() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));
        for _ in 0..100 {
            let jittered = policy.jittered_delay(2);
            assert!(jittered >= Duration::from_millis(100));
            assert!(jittered <= Duration::from_millis(200));
        }
    }

    #[test]
    fn defaults_keep_the_original_knobs() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.base_delay, Duration::from_secs(3));
        assert_eq!(policy.total_budget, Duration::from_secs(600));
    }
}
