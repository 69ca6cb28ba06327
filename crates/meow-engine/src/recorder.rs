//! Shortcut recorder state machine.
//!
//! A pure reducer: the settings controller feeds it key events and timeout
//! ticks and acts on the returned outcomes (messages, preference writes,
//! timers). Nothing here touches the clock or the backend.

use keycode::{Chord, KeyEvent};
use meow_protocol::{ShortcutConfigs, ShortcutDescriptor, TOGGLE_APP_ACTION};
use tokio::time::Instant;
use tracing::debug;

/// Shown while waiting for the first key combination.
pub const PLACEHOLDER: &str = "Press a key combination...";
/// Rejection reason for a key pressed without modifiers.
pub const MODIFIER_REQUIRED: &str = "Shortcut must include at least one modifier";
/// Shown when recording gives up.
pub const RECORDING_TIMED_OUT: &str = "Shortcut recording timed out";

/// A shortcut slot that can be recorded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutTarget {
    /// Show/hide the main window.
    ToggleApp,
}

impl ShortcutTarget {
    /// Every recordable slot.
    pub const ALL: [Self; 1] = [Self::ToggleApp];

    /// Name used by callers and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToggleApp => "toggleApp",
        }
    }

    /// Parse a target name; accepts the camel-case and wire spellings.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "toggleApp" | "toggle_app" => Some(Self::ToggleApp),
            _ => None,
        }
    }

    /// Human-readable action label stored with the descriptor.
    pub fn action(&self) -> &'static str {
        match self {
            Self::ToggleApp => TOGGLE_APP_ACTION,
        }
    }

    /// Factory binding for this slot.
    pub fn default_descriptor(&self) -> ShortcutDescriptor {
        match self {
            Self::ToggleApp => ShortcutDescriptor::toggle_app_default(),
        }
    }

    /// The slot inside a shortcut set.
    pub fn slot<'a>(&self, shortcuts: &'a ShortcutConfigs) -> &'a ShortcutDescriptor {
        match self {
            Self::ToggleApp => &shortcuts.toggle_app,
        }
    }

    /// Mutable access to the slot inside a shortcut set.
    pub fn slot_mut<'a>(&self, shortcuts: &'a mut ShortcutConfigs) -> &'a mut ShortcutDescriptor {
        match self {
            Self::ToggleApp => &mut shortcuts.toggle_app,
        }
    }
}

/// Where the recorder is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecorderState {
    /// Not recording.
    #[default]
    Idle,
    /// Waiting for a key combination.
    Recording {
        /// Slot being recorded.
        target: ShortcutTarget,
        /// When recording began.
        started_at: Instant,
        /// Guards the timeout armed for this session.
        session: u64,
    },
    /// The last session captured this descriptor.
    Committed(ShortcutDescriptor),
    /// The last session expired without input.
    TimedOut,
}

/// Result of feeding a key event to the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not recording, or a bare modifier press.
    Ignored,
    /// Recording was cancelled; the reason is user-facing.
    Rejected(String),
    /// A descriptor was captured for `target`.
    Committed {
        /// Slot to write.
        target: ShortcutTarget,
        /// The captured binding.
        descriptor: ShortcutDescriptor,
    },
}

/// Reducer for recording one shortcut at a time.
#[derive(Debug, Default)]
pub struct Recorder {
    state: RecorderState,
    preview: Option<String>,
    next_session: u64,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording { .. })
    }

    /// Live preview text: the placeholder while recording, the captured
    /// combination after a commit, nothing otherwise.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Start recording into `target`, replacing any session in progress.
    /// Returns the new session id.
    pub fn begin(&mut self, target: ShortcutTarget, now: Instant) -> u64 {
        self.next_session += 1;
        let session = self.next_session;
        self.state = RecorderState::Recording {
            target,
            started_at: now,
            session,
        };
        self.preview = Some(PLACEHOLDER.to_string());
        debug!(target = target.as_str(), session, "recording_begin");
        session
    }

    /// Feed a raw key-down event.
    pub fn key_down(&mut self, ev: &KeyEvent) -> KeyOutcome {
        let RecorderState::Recording { target, .. } = self.state else {
            return KeyOutcome::Ignored;
        };
        if ev.is_modifier() {
            return KeyOutcome::Ignored;
        }

        let held = ev.held_modifiers();
        if held.is_empty() {
            self.state = RecorderState::Idle;
            self.preview = None;
            debug!(key = %ev.key, "recording_rejected");
            return KeyOutcome::Rejected(MODIFIER_REQUIRED.to_string());
        }

        let chord = Chord::new(held, &ev.key_spec());
        let descriptor = ShortcutDescriptor::from_chord(&chord, target.action());
        // Events without a usable key name (dead keys, IME composition) keep
        // the session waiting.
        if !descriptor.is_valid() {
            debug!(key = ?ev.key, "recording_key_unusable");
            return KeyOutcome::Ignored;
        }
        self.preview = Some(descriptor.display());
        self.state = RecorderState::Committed(descriptor.clone());
        debug!(target = target.as_str(), chord = %chord, "recording_committed");
        KeyOutcome::Committed { target, descriptor }
    }

    /// Timeout tick for `session`. Only effective while that same session is
    /// still recording; returns whether the recorder timed out.
    pub fn time_out(&mut self, session: u64) -> bool {
        match self.state {
            RecorderState::Recording { session: s, .. } if s == session => {
                self.state = RecorderState::TimedOut;
                self.preview = None;
                debug!(session, "recording_timed_out");
                true
            }
            _ => false,
        }
    }

    /// Leave recording without committing anything.
    pub fn cancel(&mut self) {
        if self.is_recording() {
            self.state = RecorderState::Idle;
            self.preview = None;
        }
    }

    /// Back to a fresh recorder (session ids keep increasing).
    pub fn reset(&mut self) {
        self.state = RecorderState::Idle;
        self.preview = None;
    }
}
