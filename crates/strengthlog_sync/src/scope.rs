//! Process-scoped context for fire-and-forget work.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct ScopeState {
    in_flight: AtomicUsize,
    idle: Notify,
}

/// Decrements the in-flight count when a task finishes, panics, or is
/// dropped by a shutting-down runtime.
struct InFlight(Arc<ScopeState>);

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.0.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// Runs detached tasks that outlive the caller that launched them.
///
/// Cloning is cheap; clones share the same set of in-flight tasks.
#[derive(Debug, Clone)]
pub struct BackgroundScope {
    handle: Handle,
    state: Arc<ScopeState>,
}

impl BackgroundScope {
    /// Creates a scope that spawns onto `handle`.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            state: Arc::new(ScopeState::default()),
        }
    }

    /// Creates a scope on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Spawns `future` as a detached task and drops its output.
    ///
    /// Dropping or cancelling the caller does not cancel the task.
    pub fn launch<F>(&self, future: F)
    where
        F: Future + Send + 'static,
    {
        self.state.in_flight.fetch_add(1, Ordering::AcqRel);
        let guard = InFlight(Arc::clone(&self.state));
        self.handle.spawn(async move {
            let _guard = guard;
            future.await;
        });
    }

    /// Number of launched tasks that have not finished.
    pub fn in_flight(&self) -> usize {
        self.state.in_flight.load(Ordering::Acquire)
    }

    /// Waits up to `timeout` for every in-flight task to finish.
    ///
    /// Returns how many were still running when the wait ended; zero means
    /// the scope is idle.
    pub async fn drain(&self, timeout: Duration) -> usize {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let idle = self.state.idle.notified();
            tokio::pin!(idle);
            // Register before checking so a task finishing in between is not missed.
            idle.as_mut().enable();

            let remaining = self.in_flight();
            if remaining == 0 {
                return 0;
            }
            if tokio::time::timeout_at(deadline, idle).await.is_err() {
                let remaining = self.in_flight();
                tracing::debug!(remaining, "background scope drain timed out");
                return remaining;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn drain_waits_for_tasks() {
        let scope = BackgroundScope::current();
        let done = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&done);
        scope.launch(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            flag.store(true, Ordering::SeqCst);
        });

        assert_eq!(scope.drain(Duration::from_secs(5)).await, 0);
        assert!(done.load(Ordering::SeqCst));
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn drain_reports_stragglers() {
        let scope = BackgroundScope::current();
        let (tx, rx) = oneshot::channel::<()>();
        scope.launch(async move {
            let _ = rx.await;
        });

        assert_eq!(scope.in_flight(), 1);
        assert_eq!(scope.drain(Duration::from_millis(20)).await, 1);

        drop(tx);
        assert_eq!(scope.drain(Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn tasks_outlive_the_launching_future() {
        let scope = BackgroundScope::current();
        let (tx, rx) = oneshot::channel();

        let launcher = {
            let scope = scope.clone();
            tokio::spawn(async move {
                scope.launch(async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    let _ = tx.send(7);
                });
                std::future::pending::<()>().await;
            })
        };
        tokio::task::yield_now().await;
        launcher.abort();

        assert_eq!(rx.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn panicking_task_is_not_counted() {
        let scope = BackgroundScope::current();
        scope.launch(async { panic!("boom") });
        assert_eq!(scope.drain(Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn drain_on_idle_scope_returns_immediately() {
        let scope = BackgroundScope::current();
        assert_eq!(scope.drain(Duration::ZERO).await, 0);
    }
}
