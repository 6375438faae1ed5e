/*!
# Tracker Module

This module defines the in-flight task tracker used for backpressure.

The tracker maps a dedup key (the message id) to a spawned task and offers:
- `add` to spawn and register a task unless its key is already tracked
- `count` to read how many tasks are tracked
- `wait_one` to block until any task settles
- `wait_all` to block until every task settles

Settlement is flagged eagerly when a task finishes, succeeds, fails or panics,
but entries are only removed by the wait calls. `count()` can therefore
overstate the real amount of in-flight work until the next wait.
*/

use crate::error::{Result, SluiceError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

/// A tracked task, reduced to its completion state
struct TrackedTask {
    settled: Arc<AtomicBool>,
}

impl TrackedTask {
    fn is_settled(&self) -> bool {
        self.settled.load(Ordering::SeqCst)
    }
}

/// Flags a task as settled when dropped, including during a panic unwind
struct SettleGuard {
    settled: Arc<AtomicBool>,
    settle_count: Arc<AtomicU64>,
    notify: Arc<Notify>,
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        self.settled.store(true, Ordering::SeqCst);
        self.settle_count.fetch_add(1, Ordering::SeqCst);
        self.notify.notify_waiters();
    }
}

/// Tracks in-flight tasks keyed by message id
#[derive(Default)]
pub struct TaskTracker {
    tasks: Mutex<HashMap<String, TrackedTask>>,
    settled: Arc<Notify>,

    /// Total number of settlements, so waiters notice one another's purges
    settle_count: Arc<AtomicU64>,
}

impl TaskTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `task` and track it under `key`.
    ///
    /// Returns `false` without spawning anything when `key` is already
    /// tracked, settled or not; the duplicate future is dropped unpolled.
    /// The key becomes free again once a wait call purges its entry. The
    /// task's output is discarded, so errors must be reported by the task
    /// itself.
    pub async fn add<F>(&self, key: impl Into<String>, task: F) -> bool
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let mut tasks = self.tasks.lock().await;

        match tasks.entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(self.spawn(task));
                true
            }
        }
    }

    fn spawn<F>(&self, task: F) -> TrackedTask
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let settled = Arc::new(AtomicBool::new(false));
        let guard = SettleGuard {
            settled: settled.clone(),
            settle_count: self.settle_count.clone(),
            notify: self.settled.clone(),
        };

        tokio::spawn(async move {
            let _guard = guard;
            task.await;
        });

        TrackedTask { settled }
    }

    /// Number of tracked tasks, settled ones included until purged
    pub async fn count(&self) -> usize {
        self.tasks.lock().await.len()
    }

    /// Check whether nothing is tracked
    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }

    /// Wait until at least one tracked task has settled, then purge every
    /// settled task.
    ///
    /// Calling this on an empty tracker is an error. Every concurrent caller
    /// returns once a task settles, even when another caller purged it first.
    pub async fn wait_one(&self) -> Result<()> {
        let seen = self.settle_count.load(Ordering::SeqCst);
        let mut first_pass = true;

        loop {
            // Registered before checking so a settle in between is not missed
            let notified = self.settled.notified();

            {
                let mut tasks = self.tasks.lock().await;

                if tasks.is_empty() {
                    return if first_pass {
                        Err(SluiceError::NoTrackedTasks)
                    } else {
                        Ok(())
                    };
                }

                if tasks.values().any(TrackedTask::is_settled) {
                    tasks.retain(|_, task| !task.is_settled());
                    return Ok(());
                }

                if self.settle_count.load(Ordering::SeqCst) != seen {
                    return Ok(());
                }
            }

            first_pass = false;
            notified.await;
        }
    }

    /// Wait until every tracked task has settled, including tasks registered
    /// while waiting, then clear the tracker.
    pub async fn wait_all(&self) {
        loop {
            let notified = self.settled.notified();

            {
                let mut tasks = self.tasks.lock().await;
                if tasks.values().all(TrackedTask::is_settled) {
                    tasks.clear();
                    return;
                }
            }

            notified.await;
        }
    }
}
