use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use meow_protocol::{NotifyKind, Surface, UiMsg, ipc::UiTx};
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{info, trace};

use crate::timer::Timers;

const EXPIRE_TIMER: &str = "expire";

/// A transient message and the instant it disappears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Error or success.
    pub kind: NotifyKind,
    /// Text shown to the user.
    pub message: String,
    /// When the auto-clear fires.
    pub expires_at: Instant,
}

#[derive(Debug)]
struct Slot {
    current: Option<Notification>,
    /// Bumped on every show; an expiry only clears the message it was armed for.
    seq: u64,
}

/// A single-slot message area that clears itself after a per-message delay.
///
/// Every change is mirrored to the UI channel as [`UiMsg::Notify`] or
/// [`UiMsg::NotifyCleared`].
#[derive(Clone)]
pub struct NotificationSurface {
    surface: Surface,
    slot: Arc<Mutex<Slot>>,
    timers: Timers,
    tx: UiTx,
    shown: Arc<AtomicU64>,
}

impl NotificationSurface {
    /// Create a surface that mirrors its changes to `tx`.
    pub fn new(surface: Surface, tx: UiTx) -> Self {
        Self {
            surface,
            slot: Arc::new(Mutex::new(Slot {
                current: None,
                seq: 0,
            })),
            timers: Timers::new(),
            tx,
            shown: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Replace the current message and (re)arm its expiry.
    pub fn show(&self, kind: NotifyKind, message: impl Into<String>, ttl: Duration) {
        let message = message.into();
        info!(surface = ?self.surface, kind = ?kind, text = %message, "notification_display");
        let seq = {
            let mut slot = self.slot.lock();
            slot.seq += 1;
            slot.current = Some(Notification {
                kind,
                message: message.clone(),
                expires_at: Instant::now() + ttl,
            });
            slot.seq
        };
        self.shown.fetch_add(1, Ordering::Relaxed);
        self.emit(UiMsg::Notify {
            surface: self.surface,
            kind,
            text: message,
        });

        let this = self.clone();
        self.timers.start(EXPIRE_TIMER, ttl, async move {
            this.expire(seq);
        });
    }

    /// Clear the current message now and cancel its expiry.
    pub fn dismiss(&self) {
        self.timers.stop(EXPIRE_TIMER);
        let cleared = self.slot.lock().current.take();
        if let Some(n) = cleared {
            self.emit(UiMsg::NotifyCleared {
                surface: self.surface,
                kind: n.kind,
            });
        }
    }

    /// The message currently visible, if any.
    pub fn current(&self) -> Option<Notification> {
        self.slot.lock().current.clone()
    }

    /// Text of the visible message, if any.
    pub fn message(&self) -> Option<String> {
        self.slot.lock().current.as_ref().map(|n| n.message.clone())
    }

    /// Total number of messages shown since creation.
    pub fn shown_count(&self) -> u64 {
        self.shown.load(Ordering::Relaxed)
    }

    fn expire(&self, seq: u64) {
        let cleared = {
            let mut slot = self.slot.lock();
            if slot.seq != seq {
                return;
            }
            slot.current.take()
        };
        if let Some(n) = cleared {
            trace!(surface = ?self.surface, "notification_expired");
            self.emit(UiMsg::NotifyCleared {
                surface: self.surface,
                kind: n.kind,
            });
        }
    }

    fn emit(&self, msg: UiMsg) {
        if self.tx.send(msg).is_err() {
            trace!(surface = ?self.surface, "ui channel closed; message dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use meow_protocol::ipc::ui_channel;
    use tokio::time;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn expires_after_ttl() {
        let (tx, mut rx) = ui_channel();
        let s = NotificationSurface::new(Surface::App, tx);
        s.show(NotifyKind::Success, "done", Duration::from_millis(5000));
        assert_eq!(s.message().as_deref(), Some("done"));

        time::sleep(Duration::from_millis(4900)).await;
        assert!(s.current().is_some());
        time::sleep(Duration::from_millis(200)).await;
        assert!(s.current().is_none());

        assert!(matches!(rx.recv().await, Some(UiMsg::Notify { .. })));
        assert_eq!(
            rx.recv().await,
            Some(UiMsg::NotifyCleared {
                surface: Surface::App,
                kind: NotifyKind::Success
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn second_show_restarts_expiry() {
        let (tx, _rx) = ui_channel();
        let s = NotificationSurface::new(Surface::Settings, tx);
        s.show(NotifyKind::Error, "first", Duration::from_millis(3000));
        time::sleep(Duration::from_millis(2000)).await;
        s.show(NotifyKind::Error, "second", Duration::from_millis(3000));

        time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(s.message().as_deref(), Some("second"));
        time::sleep(Duration::from_millis(1100)).await;
        assert!(s.current().is_none());
        assert_eq!(s.shown_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_cancels_expiry() {
        let (tx, mut rx) = ui_channel();
        let s = NotificationSurface::new(Surface::App, tx);
        s.show(NotifyKind::Error, "oops", Duration::from_millis(1000));
        s.dismiss();
        assert!(s.current().is_none());

        time::sleep(Duration::from_millis(2000)).await;
        assert!(matches!(rx.recv().await, Some(UiMsg::Notify { .. })));
        assert!(matches!(rx.recv().await, Some(UiMsg::NotifyCleared { .. })));
        assert!(rx.try_recv().is_err());
    }
}
