//! Settle-delay scheduling for live applies

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// Runs at most one pending callback after a delay.
///
/// Scheduling again replaces the pending callback. A callback whose delay
/// has elapsed is never aborted: cancelling it only detaches the task, so
/// a host write already under way runs to completion.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    handle: JoinHandle<()>,
    fired: Arc<AtomicBool>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` after `delay` unless cancelled or rescheduled first.
    pub fn schedule<F, Fut>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            flag.store(true, Ordering::SeqCst);
            callback().await;
        });

        self.pending = Some(Pending { handle, fired });
    }

    /// Drop the pending callback. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) if !pending.fired.load(Ordering::SeqCst) => {
                pending.handle.abort();
                trace!("Cancelled pending callback");
                true
            }
            _ => false,
        }
    }

    /// Whether a callback is still waiting out its delay.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|pending| {
            !pending.fired.load(Ordering::SeqCst) && !pending.handle.is_finished()
        })
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let read = Arc::clone(&count);
        (count, move || read.load(Ordering::SeqCst))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (count, read) = counter();
        let mut debouncer = Debouncer::new();

        debouncer.schedule(Duration::from_millis(400), move || async move {
            count.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(399)).await;
        assert_eq!(read(), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(read(), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending() {
        let (count, read) = counter();
        let mut debouncer = Debouncer::new();

        for _ in 0..5 {
            let count = Arc::clone(&count);
            debouncer.schedule(Duration::from_millis(400), move || async move {
                count.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(read(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop() {
        let (count, read) = counter();

        let mut debouncer = Debouncer::new();
        let first = Arc::clone(&count);
        debouncer.schedule(Duration::from_millis(50), move || async move {
            first.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        let second = Arc::clone(&count);
        debouncer.schedule(Duration::from_millis(50), move || async move {
            second.fetch_add(1, Ordering::SeqCst);
        });
        drop(debouncer);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(read(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_lets_callback_finish() {
        let (count, read) = counter();
        let mut debouncer = Debouncer::new();

        debouncer.schedule(Duration::from_millis(10), move || async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            count.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(read(), 1);
    }
}
