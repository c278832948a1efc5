//! Guard timers and single-slot task ownership.
//!
//! [`guarded`] races an operation against a deadline; when the deadline wins
//! the operation's future is dropped, so a late result can never be observed.
//! [`TaskSlot`] owns the one in-flight task of an operation kind: starting a
//! new task aborts the previous one together with its guard.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;

/// The guard deadline passed before the guarded operation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no result within {}ms", .after.as_millis())]
pub struct GuardElapsed {
    pub after: Duration,
}

/// Runs `operation`, giving up after `limit`.
///
/// # Errors
///
/// Returns [`GuardElapsed`] if `operation` has not completed within `limit`.
pub async fn guarded<F>(limit: Duration, operation: F) -> Result<F::Output, GuardElapsed>
where
    F: Future,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| GuardElapsed { after: limit })
}

/// Holds at most one running task for a single operation kind.
pub struct TaskSlot {
    name: &'static str,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskSlot {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handle: Mutex::new(None),
        }
    }

    /// Spawns `task`, aborting whatever task the slot held before.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            if !previous.is_finished() {
                tracing::debug!(slot = self.name, "superseding in-flight task");
            }
            previous.abort();
        }
        *slot = Some(tokio::spawn(task));
    }

    /// Aborts the running task, if any. Returns whether one was running.
    pub fn cancel(&self) -> bool {
        let previous = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match previous {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                tracing::debug!(slot = self.name, "cancelled in-flight task");
                true
            }
            _ => false,
        }
    }

    /// Waits for the current task, if any, to finish or be aborted.
    pub async fn settle(&self) {
        let current = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = current {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    tracing::error!(slot = self.name, error = %e, "task panicked");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn guarded_returns_output_before_deadline() {
        let result = guarded(Duration::from_secs(5), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            42
        })
        .await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test(start_paused = true)]
    async fn guarded_fires_once_deadline_passes() {
        let result = guarded(Duration::from_millis(15_000), std::future::pending::<()>()).await;
        assert_eq!(
            result,
            Err(GuardElapsed {
                after: Duration::from_millis(15_000)
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn starting_a_new_task_aborts_the_previous_one() {
        let slot = TaskSlot::new("test");
        let finished = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let finished = Arc::clone(&finished);
            slot.start(async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                finished.fetch_add(1, Ordering::SeqCst);
            });
        }
        slot.settle().await;

        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent() {
        let slot = TaskSlot::new("test");
        assert!(!slot.cancel());

        slot.start(std::future::pending());
        assert!(slot.cancel());
        assert!(!slot.cancel());
        slot.settle().await;
    }

    #[tokio::test]
    async fn settle_on_empty_slot_returns_immediately() {
        TaskSlot::new("test").settle().await;
    }
}
