//! Built-in configuration defaults.

use std::env;

/// Per-call backend timeout.
pub const GATEWAY_TIMEOUT_MS: u64 = 3000;
/// Search gets longer than other calls.
pub const SEARCH_TIMEOUT_MS: u64 = 15_000;
/// Window used to collapse rapid save requests.
pub const SAVE_DEBOUNCE_MS: u64 = 200;
/// How long shortcut recording waits for a key.
pub const RECORDING_TIMEOUT_MS: u64 = 10_000;

/// App-level notices.
pub const NOTIFY_APP_MS: u64 = 5000;
/// Settings panel success line.
pub const NOTIFY_SETTINGS_SUCCESS_MS: u64 = 3000;
/// Settings panel error line after a failed save.
pub const NOTIFY_SETTINGS_ERROR_MS: u64 = 5000;
/// Settings panel error line after a partially failed save.
pub const NOTIFY_PARTIAL_ERROR_MS: u64 = 7000;
/// Shortcut recorder errors.
pub const NOTIFY_RECORDER_ERROR_MS: u64 = 3000;

/// Socket file name used under the temp directory.
pub const SOCKET_NAME: &str = "mememeow.sock";

pub(crate) fn default_socket() -> String {
    env::temp_dir().join(SOCKET_NAME).display().to_string()
}

pub(crate) fn default_gateway_ms() -> u64 {
    GATEWAY_TIMEOUT_MS
}

pub(crate) fn default_search_ms() -> u64 {
    SEARCH_TIMEOUT_MS
}

pub(crate) fn default_save_debounce_ms() -> u64 {
    SAVE_DEBOUNCE_MS
}

pub(crate) fn default_recording_ms() -> u64 {
    RECORDING_TIMEOUT_MS
}

pub(crate) fn default_app_ms() -> u64 {
    NOTIFY_APP_MS
}

pub(crate) fn default_settings_success_ms() -> u64 {
    NOTIFY_SETTINGS_SUCCESS_MS
}

pub(crate) fn default_settings_error_ms() -> u64 {
    NOTIFY_SETTINGS_ERROR_MS
}

pub(crate) fn default_partial_error_ms() -> u64 {
    NOTIFY_PARTIAL_ERROR_MS
}

pub(crate) fn default_recorder_error_ms() -> u64 {
    NOTIFY_RECORDER_ERROR_MS
}
