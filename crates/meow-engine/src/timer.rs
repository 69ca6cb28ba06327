//! Keyed one-shot timers with cancellation.
//!
//! Each id owns at most one pending timer. Starting a timer for an id that is
//! already pending cancels the old one first; a generation number recorded at
//! start time guarantees a superseded timer never fires, even when its sleep
//! completed concurrently with the restart.

use std::{
    collections::HashMap,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::trace;

struct TimerEntry {
    token: CancellationToken,
    generation: u64,
}

/// One-shot timer registry: runs a future once after a delay unless stopped.
#[derive(Clone, Default)]
pub struct Timers {
    entries: Arc<Mutex<HashMap<String, TimerEntry>>>,
    next_generation: Arc<AtomicU64>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a timer is pending for the given id.
    pub fn is_active(&self, id: &str) -> bool {
        self.entries.lock().contains_key(id)
    }

    /// Start or replace the timer for `id`; `on_fire` runs once `delay` has
    /// elapsed, unless the timer is stopped or replaced before then.
    pub fn start<F>(&self, id: &str, delay: Duration, on_fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let deadline = Instant::now() + delay;
        let token = CancellationToken::new();
        let cancel = token.clone();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        {
            let mut map = self.entries.lock();
            if let Some(old) = map.insert(id.to_string(), TimerEntry { token, generation }) {
                old.token.cancel();
                trace!(timer = %id, "timer_replaced");
            }
        }

        let entries = self.entries.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            trace!(timer = %id, delay_ms = delay.as_millis() as u64, "timer_start");
            tokio::select! {
                _ = time::sleep_until(deadline) => {}
                _ = cancel.cancelled() => {
                    trace!(timer = %id, "timer_cancelled");
                    return;
                }
            }

            // Claim the entry; a restart that raced the sleep wins.
            {
                let mut map = entries.lock();
                match map.get(&id) {
                    Some(e) if e.generation == generation => {
                        map.remove(&id);
                    }
                    _ => return,
                }
            }
            trace!(timer = %id, "timer_fire");
            on_fire.await;
        });
    }

    /// Stop the timer for `id` if pending.
    pub fn stop(&self, id: &str) {
        if let Some(entry) = self.entries.lock().remove(id) {
            entry.token.cancel();
            trace!(timer = %id, "timer_stop");
        }
    }

    /// Stop every pending timer.
    pub fn clear(&self) {
        let drained: Vec<TimerEntry> = self.entries.lock().drain().map(|(_, e)| e).collect();
        for e in drained {
            e.token.cancel();
        }
        trace!("timer_clear");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn bump(hits: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let timers = Timers::new();
        let hits = Arc::new(AtomicUsize::new(0));
        timers.start("a", Duration::from_millis(100), bump(&hits));
        assert!(timers.is_active("a"));

        time::sleep(Duration::from_millis(99)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!timers.is_active("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_supersedes_previous() {
        let timers = Timers::new();
        let hits = Arc::new(AtomicUsize::new(0));
        timers.start("a", Duration::from_millis(100), bump(&hits));
        time::sleep(Duration::from_millis(60)).await;
        timers.start("a", Duration::from_millis(100), bump(&hits));

        time::sleep(Duration::from_millis(60)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_and_clear_cancel() {
        let timers = Timers::new();
        let hits = Arc::new(AtomicUsize::new(0));
        timers.start("a", Duration::from_millis(10), bump(&hits));
        timers.start("b", Duration::from_millis(10), bump(&hits));
        timers.start("c", Duration::from_millis(10), bump(&hits));
        timers.stop("a");
        assert!(!timers.is_active("a"));
        timers.clear();
        assert!(!timers.is_active("b"));

        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
