//! Configuration data types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Backend connection.
    #[serde(default)]
    pub backend: Backend,
    /// Call and timer durations.
    #[serde(default)]
    pub timeouts: Timeouts,
    /// Message lifetimes.
    #[serde(default)]
    pub notify: Notify,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Backend {
    /// Unix socket the backend listens on.
    #[serde(default = "defaults::default_socket")]
    pub socket: String,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            socket: defaults::default_socket(),
        }
    }
}

/// Timeouts and debounce windows, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Timeouts {
    /// Per-call backend timeout (everything except search).
    #[serde(default = "defaults::default_gateway_ms")]
    pub gateway_ms: u64,
    /// Search call timeout.
    #[serde(default = "defaults::default_search_ms")]
    pub search_ms: u64,
    /// Save debounce window.
    #[serde(default = "defaults::default_save_debounce_ms")]
    pub save_debounce_ms: u64,
    /// Shortcut recording timeout.
    #[serde(default = "defaults::default_recording_ms")]
    pub recording_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            gateway_ms: defaults::GATEWAY_TIMEOUT_MS,
            search_ms: defaults::SEARCH_TIMEOUT_MS,
            save_debounce_ms: defaults::SAVE_DEBOUNCE_MS,
            recording_ms: defaults::RECORDING_TIMEOUT_MS,
        }
    }
}

impl Timeouts {
    /// Per-call backend timeout.
    pub fn gateway(&self) -> Duration {
        Duration::from_millis(self.gateway_ms)
    }

    /// Search call timeout.
    pub fn search(&self) -> Duration {
        Duration::from_millis(self.search_ms)
    }

    /// Save debounce window.
    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    /// Shortcut recording timeout.
    pub fn recording(&self) -> Duration {
        Duration::from_millis(self.recording_ms)
    }
}

/// Lifetimes of transient messages, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Notify {
    /// App-level notices.
    #[serde(default = "defaults::default_app_ms")]
    pub app_ms: u64,
    /// Settings success line.
    #[serde(default = "defaults::default_settings_success_ms")]
    pub settings_success_ms: u64,
    /// Settings error line after a failed save or load.
    #[serde(default = "defaults::default_settings_error_ms")]
    pub settings_error_ms: u64,
    /// Settings error line after a partially failed save.
    #[serde(default = "defaults::default_partial_error_ms")]
    pub partial_error_ms: u64,
    /// Shortcut recorder errors.
    #[serde(default = "defaults::default_recorder_error_ms")]
    pub recorder_error_ms: u64,
}

impl Default for Notify {
    fn default() -> Self {
        Self {
            app_ms: defaults::NOTIFY_APP_MS,
            settings_success_ms: defaults::NOTIFY_SETTINGS_SUCCESS_MS,
            settings_error_ms: defaults::NOTIFY_SETTINGS_ERROR_MS,
            partial_error_ms: defaults::NOTIFY_PARTIAL_ERROR_MS,
            recorder_error_ms: defaults::NOTIFY_RECORDER_ERROR_MS,
        }
    }
}

impl Notify {
    /// App-level notice lifetime.
    pub fn app(&self) -> Duration {
        Duration::from_millis(self.app_ms)
    }

    /// Settings success line lifetime.
    pub fn settings_success(&self) -> Duration {
        Duration::from_millis(self.settings_success_ms)
    }

    /// Settings error line lifetime.
    pub fn settings_error(&self) -> Duration {
        Duration::from_millis(self.settings_error_ms)
    }

    /// Partial-save error line lifetime.
    pub fn partial_error(&self) -> Duration {
        Duration::from_millis(self.partial_error_ms)
    }

    /// Recorder error lifetime.
    pub fn recorder_error(&self) -> Duration {
        Duration::from_millis(self.recorder_error_ms)
    }
}
