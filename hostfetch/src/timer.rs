//! One-shot timers on the tokio runtime.

use std::time::Duration;

use tokio::task::JoinHandle;

/// A pending callback scheduled with [`Timer::schedule_after`].
///
/// Dropping the timer cancels the callback if it has not run yet, so a
/// timer held across an `.await` is cleared on every exit path.
#[derive(Debug)]
pub(crate) struct Timer {
    handle: JoinHandle<()>,
}

impl Timer {
    /// Run `callback` once `delay` has elapsed.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn schedule_after<F>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        Self { handle }
    }

    /// Cancel the callback if it has not fired.
    pub(crate) fn cancel(self) {
        drop(self)
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
