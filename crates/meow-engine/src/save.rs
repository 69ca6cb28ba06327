//! The save cycle: push edited preferences to the backend step by step and
//! aggregate the outcome.
//!
//! Every step is attempted even when an earlier one failed; the only
//! dependency is that shortcuts are refreshed only after they were stored.

use meow_gateway::Gateway;
use tracing::{debug, warn};

use crate::PreferencesState;

/// Success text after a fully successful save.
pub const SAVED: &str = "Settings saved";
/// Success text after a save in which some steps failed.
pub const PARTIALLY_SAVED: &str = "Settings partially saved";

/// Overall outcome of a save cycle, derived from a [`SaveReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Clipboard stored, shortcuts stored and re-registered.
    AllSucceeded,
    /// Something was stored but at least one step failed.
    PartialSuccess,
    /// Neither setting was stored.
    AllFailed,
}

/// Per-step outcome of one save cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// `set_copy_to_clipboard` succeeded.
    pub clipboard_saved: bool,
    /// `set_shortcuts` succeeded.
    pub shortcuts_saved: bool,
    /// `refresh_shortcuts` was attempted and succeeded.
    pub shortcuts_refreshed: bool,
    /// One message per failed step, in step order.
    pub errors: Vec<String>,
}

impl SaveReport {
    /// Classify the cycle.
    pub fn status(&self) -> SaveStatus {
        if self.clipboard_saved && self.shortcuts_saved && self.shortcuts_refreshed {
            SaveStatus::AllSucceeded
        } else if (self.clipboard_saved || self.shortcuts_saved) && !self.errors.is_empty() {
            SaveStatus::PartialSuccess
        } else {
            SaveStatus::AllFailed
        }
    }

    /// Success line to display, if any.
    pub fn success_message(&self) -> Option<&'static str> {
        match self.status() {
            SaveStatus::AllSucceeded => Some(SAVED),
            SaveStatus::PartialSuccess => Some(PARTIALLY_SAVED),
            SaveStatus::AllFailed => None,
        }
    }

    /// Error line to display, if any: every failure, one per line.
    pub fn error_message(&self) -> Option<String> {
        match self.status() {
            SaveStatus::AllSucceeded => None,
            _ => Some(self.errors.join("\n")),
        }
    }
}

/// Run the three save steps in order against `gateway`.
pub async fn run_save_cycle(gateway: &Gateway, prefs: &PreferencesState) -> SaveReport {
    let mut report = SaveReport::default();

    match gateway.set_copy_to_clipboard(prefs.copy_to_clipboard).await {
        Ok(()) => report.clipboard_saved = true,
        Err(e) => report
            .errors
            .push(format!("Failed to save clipboard setting: {e}")),
    }

    match gateway.set_shortcuts(&prefs.shortcuts).await {
        Ok(()) => report.shortcuts_saved = true,
        Err(e) => report.errors.push(format!("Failed to save shortcuts: {e}")),
    }

    if report.shortcuts_saved {
        match gateway.refresh_shortcuts().await {
            Ok(()) => report.shortcuts_refreshed = true,
            Err(e) => report
                .errors
                .push(format!("Failed to register shortcuts: {e}")),
        }
    }

    let status = report.status();
    if report.errors.is_empty() {
        debug!(status = ?status, "save_cycle_done");
    } else {
        warn!(status = ?status, errors = report.errors.len(), "save_cycle_done");
    }
    report
}
