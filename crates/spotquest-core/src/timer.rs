//! Single-shot, cancellable round countdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A 1-second-resolution countdown for one round.
///
/// `on_tick(remaining)` fires each second; `on_expire()` fires at most
/// once when the countdown reaches zero. The expiry callback is `FnOnce`
/// and is consumed by the countdown task, so a double invocation cannot
/// compile; `cancel()` prevents it entirely. A second `start()`
/// supersedes the first countdown (the superseded one never expires).
#[derive(Default)]
pub struct RoundTimer {
    active: Option<ActiveCountdown>,
}

struct ActiveCountdown {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a countdown task is live.
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .map(|c| !c.task.is_finished())
            .unwrap_or(false)
    }

    /// Begins a countdown of `duration_secs` seconds.
    ///
    /// Any countdown already running is cancelled first, so at most one
    /// expiry can ever result from any sequence of `start` calls.
    pub fn start<T, E>(&mut self, duration_secs: u64, on_tick: T, on_expire: E)
    where
        T: Fn(u64) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        self.cancel();

        let cancelled = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn({
            let cancelled = cancelled.clone();
            async move {
                let mut interval = tokio::time::interval(Duration::from_secs(1));
                // The first tick of a fresh interval completes immediately.
                interval.tick().await;

                let mut remaining = duration_secs;
                while remaining > 0 {
                    interval.tick().await;
                    if cancelled.load(Ordering::SeqCst) {
                        return;
                    }
                    remaining -= 1;
                    on_tick(remaining);
                }
                if !cancelled.load(Ordering::SeqCst) {
                    on_expire();
                }
            }
        });

        self.active = Some(ActiveCountdown { cancelled, task });
    }

    /// Stops the countdown. Idempotent; safe after expiry. An expiry
    /// already past its cancellation check may still run to completion
    /// concurrently with this call; callers that need a hard cutoff
    /// gate the callback on their own claim (see `TransitionGuard`).
    pub fn cancel(&mut self) {
        if let Some(countdown) = self.active.take() {
            countdown.cancelled.store(true, Ordering::SeqCst);
            countdown.task.abort();
        }
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
