//! Scoped periodic refresh timer for live-updating displays
//!
//! The dashboard re-evaluates its earned-ROI snapshot on a fixed cadence.
//! Each consuming view owns its own timer instance; stopping (or dropping)
//! the instance releases the background thread. There is no process-global
//! interval shared across views.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// A background timer that invokes a callback once per period
///
/// The first invocation happens immediately on start, matching the
/// compute-then-poll behavior live displays expect. The timer stops when
/// `stop` is called or the instance is dropped, joining the worker thread
/// so no tick runs after teardown.
pub struct RefreshTimer {
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    /// Spawn the timer thread and run `tick` every `period`
    pub fn start<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_flag = Arc::clone(&stop_flag);

        let handle = std::thread::spawn(move || {
            while !thread_flag.load(Ordering::Relaxed) {
                tick();

                // Sleep in short slices so stop() takes effect promptly
                // even with long periods
                let mut remaining = period;
                while !thread_flag.load(Ordering::Relaxed) && remaining > Duration::ZERO {
                    let slice = remaining.min(Duration::from_millis(25));
                    std::thread::sleep(slice);
                    remaining = remaining.saturating_sub(slice);
                }
            }
        });

        Self {
            stop_flag,
            handle: Some(handle),
        }
    }

    /// Stop the timer and wait for the worker thread to finish
    ///
    /// Idempotent; also invoked on drop.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Whether the timer is still running
    pub fn is_running(&self) -> bool {
        self.handle.is_some() && !self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
