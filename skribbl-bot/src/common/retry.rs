use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Bounded retry: at most `max_attempts` tries, `delay_ms` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts,
            delay_ms,
        }
    }

    /// Policy that polls every `delay` until `timeout` has elapsed.
    #[must_use]
    pub fn within(timeout: Duration, delay: Duration) -> Self {
        let delay_ms = delay.as_millis().max(1);
        let attempts = (timeout.as_millis() / delay_ms).max(1);
        Self {
            max_attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
            delay_ms: u64::try_from(delay_ms).unwrap_or(u64::MAX),
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    Success(T),
    Exhausted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Go ahead with attempt number `n` (1-based).
    Go(u32),
    Exhausted,
    Cancelled,
}

/// Hand-driven retry state, for loops whose body borrows too much to fit in
/// a closure.
#[derive(Debug, Clone)]
pub struct Retry {
    policy: RetryPolicy,
    attempts: u32,
}

impl Retry {
    #[must_use]
    pub const fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Wait out the delay (except before the first attempt) and report
    /// whether another attempt may run.
    pub async fn next_attempt(&mut self, cancel: &CancellationToken) -> Attempt {
        if cancel.is_cancelled() {
            return Attempt::Cancelled;
        }
        if self.attempts >= self.policy.max_attempts {
            return Attempt::Exhausted;
        }
        if self.attempts > 0 && !pause(self.policy.delay(), cancel).await {
            return Attempt::Cancelled;
        }
        self.attempts += 1;
        Attempt::Go(self.attempts)
    }
}

/// Sleep for `duration` unless `cancel` fires first. Returns `false` when
/// cancelled.
pub async fn pause(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(duration) => true,
    }
}

/// Run `attempt` until it yields `Some`, the policy runs out, or `cancel`
/// fires.
pub async fn retry_until<T, F, Fut>(
    policy: RetryPolicy,
    cancel: &CancellationToken,
    mut attempt: F,
) -> RetryOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let mut retry = Retry::new(policy);
    loop {
        match retry.next_attempt(cancel).await {
            Attempt::Go(n) => {
                if let Some(value) = attempt(n).await {
                    return RetryOutcome::Success(value);
                }
            }
            Attempt::Exhausted => return RetryOutcome::Exhausted,
            Attempt::Cancelled => return RetryOutcome::Cancelled,
        }
    }
}
