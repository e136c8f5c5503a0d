//! Cancellable quiescence timer.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Default quiet period before a payload is recomputed after an edit.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs the most recently scheduled job once no new job has been scheduled
/// for `window`.
///
/// Every [`schedule`](Self::schedule) aborts the pending job and restarts
/// the wait. There is no maximum wait: a caller that keeps scheduling faster
/// than `window` never sees a job run.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replace any pending job with `job`, to run after the window elapses.
    pub fn schedule<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            job.await;
        }));
    }

    /// Drop the pending job, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a job is waiting for its window to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
