/*!
# Backoff Module

This module defines the exponential backoff timer used after fetch failures.

The timer keeps a single counter shared by every worker loop of a poller, so
the delay reflects the health of the queue endpoint as a whole:
- `wait()` sleeps for `min(2^counter, 300)` seconds, then bumps the counter
- `reset()` puts the counter back to zero after a successful fetch

The counter itself is capped at 100 to keep long-running processes away from
overflow; past 2^9 the delay cap already dominates.
*/

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time;
use tracing::debug;

/// Upper bound for a single backoff delay, in seconds
pub const MAX_DELAY_SECONDS: u64 = 300;

/// Upper bound for the backoff counter
pub const MAX_COUNTER: u32 = 100;

/// Delay for a given counter value: `min(2^counter, 300)` seconds
pub fn delay_for(counter: u32) -> Duration {
    let seconds = 2u64
        .checked_pow(counter)
        .unwrap_or(u64::MAX)
        .min(MAX_DELAY_SECONDS);
    Duration::from_secs(seconds)
}

/// Exponential backoff timer with a shared counter
#[derive(Debug, Default)]
pub struct BackoffTimer {
    counter: AtomicU32,
}

impl BackoffTimer {
    /// Create a new timer with the counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counter value
    pub fn counter(&self) -> u32 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Delay the next call to `wait()` would sleep for
    pub fn next_delay(&self) -> Duration {
        delay_for(self.counter())
    }

    /// Sleep for the current delay, then increment the counter.
    ///
    /// The delay is computed from the counter observed on entry. The
    /// increment only happens once the sleep has elapsed, so a caller that is
    /// cancelled mid-sleep leaves the counter untouched.
    pub async fn wait(&self) {
        let delay = self.next_delay();
        debug!("Backing off for {:?}", delay);
        time::sleep(delay).await;

        // Saturating at MAX_COUNTER, so the closure never returns None
        let _ = self
            .counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |counter| {
                Some(counter.saturating_add(1).min(MAX_COUNTER))
            });
    }

    /// Reset the counter to zero
    pub fn reset(&self) {
        self.counter.store(0, Ordering::SeqCst);
    }
}
