//! Clock source for the timer engines.
//!
//! The engines are passive: they only move when fed a wall-clock delta.
//! `Ticker` is the thin adapter that supplies those deltas from a background
//! thread at a fixed period. The delta passed to the callback is measured
//! between firings, so late wakeups (a backgrounded host, a busy machine)
//! carry their full elapsed time instead of drifting.
//!
//! Dropping or stopping the ticker cancels the thread; the callback never
//! fires after teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Tick period for the session countdown.
pub const SESSION_TICK: Duration = Duration::from_secs(1);

/// Tick period for breathing phase progress.
pub const BREATH_TICK: Duration = Duration::from_millis(100);

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Periodic wall-clock tick source backed by a thread.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a ticker firing `on_tick(delta_ms)` every `period`.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            let mut last = Instant::now();
            loop {
                thread::park_timeout(period);
                if flag.load(Ordering::Acquire) {
                    break;
                }
                let now = Instant::now();
                let delta_ms = now.duration_since(last).as_millis() as u64;
                last = now;
                on_tick(delta_ms);
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Cancel the tick thread and wait for it to finish. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;

    #[test]
    fn ticker_delivers_positive_deltas() {
        let total = Arc::new(AtomicU64::new(0));
        let fired = Arc::new(AtomicU64::new(0));
        let (t, f) = (Arc::clone(&total), Arc::clone(&fired));

        let mut ticker = Ticker::spawn(Duration::from_millis(10), move |delta| {
            t.fetch_add(delta, Ordering::Relaxed);
            f.fetch_add(1, Ordering::Relaxed);
        });
        thread::sleep(Duration::from_millis(120));
        ticker.stop();

        assert!(fired.load(Ordering::Relaxed) >= 1);
        assert!(total.load(Ordering::Relaxed) > 0);
    }

    #[test]
    fn dropped_ticker_never_fires_again() {
        let fired = Arc::new(AtomicU64::new(0));
        let f = Arc::clone(&fired);

        let ticker = Ticker::spawn(Duration::from_millis(5), move |_| {
            f.fetch_add(1, Ordering::Relaxed);
        });
        thread::sleep(Duration::from_millis(50));
        drop(ticker);

        let after_drop = fired.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(fired.load(Ordering::Relaxed), after_drop);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut ticker = Ticker::spawn(Duration::from_millis(5), |_| {});
        ticker.stop();
        ticker.stop();
    }
}
