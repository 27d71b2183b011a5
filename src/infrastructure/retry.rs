//! Bounded polling with reduced-frequency progress logging.
//!
//! The readiness prober and any other fixed-interval wait share this
//! primitive instead of hand-rolling their own sleep loops.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Fixed-interval polling policy.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Delay between attempts.
    pub interval: Duration,
    /// Maximum number of attempts before giving up.
    pub max_attempts: u32,
    /// Log a progress line every N attempts. Zero disables progress logs.
    pub progress_every: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 60,
            progress_every: 10,
        }
    }
}

impl PollPolicy {
    /// Total time the policy is willing to wait, in seconds.
    pub fn budget_secs(&self) -> u64 {
        self.interval.as_secs() * u64::from(self.max_attempts)
    }
}

/// Poll `op` until it yields a value or the attempt budget is exhausted.
///
/// `op` receives the 1-based attempt number and returns `Some(value)` on
/// success. Returns the value and the attempt that produced it, or `None`
/// when the budget ran out. Progress is logged at the policy's reduced
/// frequency rather than on every attempt.
pub async fn poll_until<F, Fut, T>(label: &str, policy: &PollPolicy, mut op: F) -> Option<(T, u32)>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for attempt in 1..=policy.max_attempts {
        if let Some(value) = op(attempt).await {
            if attempt > 1 {
                tracing::debug!(label = %label, attempt, "Poll succeeded");
            }
            return Some((value, attempt));
        }

        if policy.progress_every > 0 && attempt % policy.progress_every == 0 {
            tracing::info!(
                label = %label,
                attempt,
                max_attempts = policy.max_attempts,
                "Still waiting"
            );
        }

        if attempt < policy.max_attempts {
            sleep(policy.interval).await;
        }
    }

    None
}
