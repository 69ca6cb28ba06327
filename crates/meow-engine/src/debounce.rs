//! Debounced save coordination.
//!
//! Rapid `request_save` calls collapse into a single save cycle that uses the
//! snapshot from the last call. While a cycle is running further requests are
//! dropped rather than queued. A reset retires any cycle already in flight:
//! it still finishes against the backend but its report is discarded.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use meow_gateway::Gateway;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::{
    PreferencesState,
    save::{SaveReport, run_save_cycle},
    timer::Timers,
};

const SAVE_TIMER: &str = "save";

/// Callback receiving the report of every completed cycle.
pub type OnSaved = Arc<dyn Fn(&SaveReport) + Send + Sync>;

/// Clears the in-progress flag on every exit path, including unwinding.
struct InProgress<'a>(&'a AtomicBool);

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Inner {
    gateway: Gateway,
    window: Duration,
    timers: Timers,
    in_progress: AtomicBool,
    /// Bumped by `reset`; cycles scheduled under an older epoch are stale.
    epoch: AtomicU64,
    on_saved: OnSaved,
    last_report: Mutex<Option<SaveReport>>,
    cycles: watch::Sender<u64>,
}

/// Schedules save cycles behind a restartable debounce window.
#[derive(Clone)]
pub struct SaveCoordinator {
    inner: Arc<Inner>,
}

impl SaveCoordinator {
    /// Create a coordinator with debounce `window`; `on_saved` runs after each
    /// cycle, before the cycle counter advances.
    pub fn new(gateway: Gateway, window: Duration, on_saved: OnSaved) -> Self {
        let (cycles, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                gateway,
                window,
                timers: Timers::new(),
                in_progress: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                on_saved,
                last_report: Mutex::new(None),
                cycles,
            }),
        }
    }

    /// Ask for `snapshot` to be saved once the debounce window elapses.
    ///
    /// Returns `false` when a cycle is already executing; the request is
    /// dropped in that case.
    pub fn request_save(&self, snapshot: PreferencesState) -> bool {
        if self.is_saving() {
            debug!("save_request_ignored_in_progress");
            return false;
        }
        let inner = self.inner.clone();
        let epoch = self.inner.epoch.load(Ordering::Acquire);
        self.inner.timers.start(SAVE_TIMER, self.inner.window, async move {
            inner.run_cycle(snapshot, epoch).await;
        });
        debug!(window_ms = self.inner.window.as_millis() as u64, "save_scheduled");
        true
    }

    /// A cycle is executing right now.
    pub fn is_saving(&self) -> bool {
        self.inner.in_progress.load(Ordering::Acquire)
    }

    /// A debounce window is open.
    pub fn is_pending(&self) -> bool {
        self.inner.timers.is_active(SAVE_TIMER)
    }

    /// Drop a pending request without running it.
    pub fn cancel_pending(&self) {
        self.inner.timers.stop(SAVE_TIMER);
    }

    /// Drop any pending request and disown the cycle in flight, if any. The
    /// running cycle completes but neither reports nor records its result.
    pub fn reset(&self) {
        self.cancel_pending();
        self.inner.epoch.fetch_add(1, Ordering::AcqRel);
        *self.inner.last_report.lock() = None;
    }

    /// Number of cycles completed so far.
    pub fn completed_cycles(&self) -> u64 {
        *self.inner.cycles.borrow()
    }

    /// Watch the completed-cycle counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.cycles.subscribe()
    }

    /// Wait until at least `n` cycles have completed and return the latest
    /// report.
    pub async fn wait_for_cycles(&self, n: u64) -> Option<SaveReport> {
        let mut rx = self.subscribe();
        if rx.wait_for(|c| *c >= n).await.is_err() {
            return None;
        }
        self.last_report()
    }

    /// Report of the most recent cycle.
    pub fn last_report(&self) -> Option<SaveReport> {
        self.inner.last_report.lock().clone()
    }
}

impl Inner {
    async fn run_cycle(&self, snapshot: PreferencesState, epoch: u64) {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("save_cycle_skipped_in_progress");
            return;
        }
        let report = {
            let _guard = InProgress(&self.in_progress);
            run_save_cycle(&self.gateway, &snapshot).await
        };
        if self.epoch.load(Ordering::Acquire) == epoch {
            (self.on_saved)(&report);
            *self.last_report.lock() = Some(report);
        } else {
            debug!(epoch, "save_cycle_discarded_after_reset");
        }
        self.cycles.send_modify(|c| *c += 1);
    }
}
