//! Settings panel controller: owns the in-memory preferences, the shortcut
//! recorder and the panel's error/success lines.

use std::{sync::Arc, time::Duration};

use keycode::KeyEvent;
use meow_gateway::Gateway;
use meow_protocol::{NotifyKind, ShortcutConfigs, ShortcutDescriptor, Surface, ipc::UiTx};
use parking_lot::Mutex;
use tokio::{sync::watch, time::Instant};
use tracing::{debug, warn};

use crate::{
    Result,
    debounce::SaveCoordinator,
    notification::NotificationSurface,
    recorder::{KeyOutcome, RECORDING_TIMED_OUT, Recorder, RecorderState, ShortcutTarget},
    save::{SaveReport, SaveStatus},
    timer::Timers,
};

const RECORDING_TIMER: &str = "recording";

/// The user's editable preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesState {
    /// Copy selected memes to the clipboard.
    pub copy_to_clipboard: bool,
    /// Global hotkeys.
    pub shortcuts: ShortcutConfigs,
}

impl Default for PreferencesState {
    fn default() -> Self {
        Self {
            copy_to_clipboard: true,
            shortcuts: ShortcutConfigs::default(),
        }
    }
}

#[derive(Default)]
struct PanelState {
    prefs: PreferencesState,
    recorder: Recorder,
    loaded: bool,
}

struct Inner {
    gateway: Gateway,
    state: Mutex<PanelState>,
    errors: NotificationSurface,
    success: NotificationSurface,
    saver: SaveCoordinator,
    timers: Timers,
    recording_timeout: Duration,
    notify: config::Notify,
}

/// Drives the settings panel.
///
/// Preferences are loaded once, edited in memory and written back only through
/// [`request_save`](Self::request_save). All state sits behind one mutex that
/// is never held across an await.
#[derive(Clone)]
pub struct SettingsController {
    inner: Arc<Inner>,
}

impl SettingsController {
    /// Create a controller using the timings from `cfg`.
    pub fn new(gateway: Gateway, cfg: &config::Config, tx: UiTx) -> Self {
        let gateway = gateway.with_default_timeout(cfg.timeouts.gateway());
        let errors = NotificationSurface::new(Surface::Settings, tx.clone());
        let success = NotificationSurface::new(Surface::Settings, tx);
        let notify = cfg.notify;

        let (on_err, on_ok) = (errors.clone(), success.clone());
        let saver = SaveCoordinator::new(
            gateway.clone(),
            cfg.timeouts.save_debounce(),
            Arc::new(move |report: &SaveReport| {
                show_report(report, &on_err, &on_ok, &notify);
            }),
        );

        Self {
            inner: Arc::new(Inner {
                gateway,
                state: Mutex::new(PanelState::default()),
                errors,
                success,
                saver,
                timers: Timers::new(),
                recording_timeout: cfg.timeouts.recording(),
                notify,
            }),
        }
    }

    /// Load preferences and shortcuts from the backend.
    pub async fn load(&self) -> Result<()> {
        let loaded = async {
            let prefs = self.inner.gateway.get_user_preferences().await?;
            let shortcuts = self.inner.gateway.get_shortcuts().await?;
            Ok::<_, crate::Error>((prefs, shortcuts))
        }
        .await;

        match loaded {
            Ok((prefs, shortcuts)) => {
                let mut st = self.inner.state.lock();
                st.prefs = PreferencesState {
                    copy_to_clipboard: prefs.copy_to_clipboard,
                    shortcuts,
                };
                st.loaded = true;
                debug!("settings_loaded");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "settings_load_failed");
                self.inner.errors.show(
                    NotifyKind::Error,
                    format!("Failed to load settings: {e}"),
                    self.inner.notify.settings_error(),
                );
                Err(e)
            }
        }
    }

    /// Preferences were loaded from the backend.
    pub fn is_loaded(&self) -> bool {
        self.inner.state.lock().loaded
    }

    /// Snapshot of the in-memory preferences.
    pub fn preferences(&self) -> PreferencesState {
        self.inner.state.lock().prefs.clone()
    }

    /// Edit the clipboard toggle in memory.
    pub fn set_copy_to_clipboard(&self, enabled: bool) {
        self.inner.state.lock().prefs.copy_to_clipboard = enabled;
    }

    /// Replace a shortcut in memory; invalid descriptors are refused.
    pub fn set_shortcut(&self, target: ShortcutTarget, descriptor: ShortcutDescriptor) -> Result<()> {
        if !descriptor.is_valid() {
            return Err(crate::Error::Validation(format!(
                "invalid shortcut: {}",
                descriptor.display()
            )));
        }
        let mut st = self.inner.state.lock();
        *target.slot_mut(&mut st.prefs.shortcuts) = descriptor;
        Ok(())
    }

    /// Schedule a debounced save of the current preferences.
    pub fn request_save(&self) -> bool {
        let snapshot = self.preferences();
        self.inner.saver.request_save(snapshot)
    }

    /// A save cycle is executing.
    pub fn is_saving(&self) -> bool {
        self.inner.saver.is_saving()
    }

    /// Watch the completed-save counter.
    pub fn save_cycles(&self) -> watch::Receiver<u64> {
        self.inner.saver.subscribe()
    }

    /// Wait for `n` completed save cycles; returns the latest report.
    pub async fn wait_for_saves(&self, n: u64) -> Option<SaveReport> {
        self.inner.saver.wait_for_cycles(n).await
    }

    /// Begin recording a shortcut for `target`.
    pub fn start_recording(&self, target: ShortcutTarget) {
        let session = self.inner.state.lock().recorder.begin(target, Instant::now());
        self.clear_messages();

        let inner = self.inner.clone();
        self.inner
            .timers
            .start(RECORDING_TIMER, self.inner.recording_timeout, async move {
                inner.recording_timed_out(session);
            });
    }

    /// Feed a key-down event captured while the panel has focus.
    pub fn key_down(&self, ev: &KeyEvent) -> KeyOutcome {
        let outcome = {
            let mut st = self.inner.state.lock();
            let outcome = st.recorder.key_down(ev);
            if let KeyOutcome::Committed { target, descriptor } = &outcome {
                *target.slot_mut(&mut st.prefs.shortcuts) = descriptor.clone();
            }
            outcome
        };

        match &outcome {
            KeyOutcome::Ignored => {}
            KeyOutcome::Rejected(reason) => {
                self.inner.timers.stop(RECORDING_TIMER);
                self.inner.errors.show(
                    NotifyKind::Error,
                    reason.clone(),
                    self.inner.notify.recorder_error(),
                );
            }
            KeyOutcome::Committed { .. } => {
                self.inner.timers.stop(RECORDING_TIMER);
            }
        }
        outcome
    }

    /// Abandon recording without changing anything.
    pub fn cancel_recording(&self) {
        self.inner.timers.stop(RECORDING_TIMER);
        self.inner.state.lock().recorder.cancel();
    }

    /// Restore the factory binding for `target` and clear the panel messages.
    pub fn reset_shortcut(&self, target: ShortcutTarget) {
        {
            let mut st = self.inner.state.lock();
            *target.slot_mut(&mut st.prefs.shortcuts) = target.default_descriptor();
        }
        self.clear_messages();
    }

    /// Recorder state.
    pub fn recorder_state(&self) -> RecorderState {
        self.inner.state.lock().recorder.state().clone()
    }

    /// Recorder preview text.
    pub fn preview(&self) -> Option<String> {
        self.inner.state.lock().recorder.preview().map(str::to_string)
    }

    /// Current error line.
    pub fn error_message(&self) -> Option<String> {
        self.inner.errors.message()
    }

    /// Current success line.
    pub fn success_message(&self) -> Option<String> {
        self.inner.success.message()
    }

    /// Drop every in-memory edit, message, timer and pending save.
    pub fn reset(&self) {
        self.inner.timers.clear();
        self.inner.saver.reset();
        {
            let mut st = self.inner.state.lock();
            st.prefs = PreferencesState::default();
            st.recorder.reset();
            st.loaded = false;
        }
        self.clear_messages();
    }

    fn clear_messages(&self) {
        self.inner.errors.dismiss();
        self.inner.success.dismiss();
    }
}

impl Inner {
    fn recording_timed_out(&self, session: u64) {
        let timed_out = self.state.lock().recorder.time_out(session);
        if timed_out {
            self.errors.show(
                NotifyKind::Error,
                RECORDING_TIMED_OUT,
                self.notify.recorder_error(),
            );
        }
    }
}

fn show_report(
    report: &SaveReport,
    errors: &NotificationSurface,
    success: &NotificationSurface,
    notify: &config::Notify,
) {
    let status = report.status();
    match report.success_message() {
        Some(text) => success.show(NotifyKind::Success, text, notify.settings_success()),
        None => success.dismiss(),
    }
    match report.error_message() {
        Some(text) => {
            let ttl = match status {
                SaveStatus::PartialSuccess => notify.partial_error(),
                _ => notify.settings_error(),
            };
            errors.show(NotifyKind::Error, text, ttl);
        }
        None => errors.dismiss(),
    }
}
