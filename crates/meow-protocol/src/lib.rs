//! Shared wire and UI types for MemeMeow.
//!
//! The backend process owns search, clipboard, preference storage and hotkey
//! registration. This crate pins down the names and payload shapes used to
//! talk to it, plus the messages the client core emits towards whatever
//! renders the UI.

use std::collections::{BTreeMap, BTreeSet};

use keycode::{Chord, Modifier, display_modifier, is_modifier_key};
use serde::{Deserialize, Serialize};

pub mod rpc;

pub use rpc::{BackendEvent, Method};

/// Label attached to the app toggle shortcut.
pub const TOGGLE_APP_ACTION: &str = "Toggle app window";

/// A hotkey: modifiers plus a single key, as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortcutDescriptor {
    /// Modifier names (`ctrl`, `alt`, `shift`, `meta`).
    pub modifiers: Vec<String>,
    /// Lower-cased non-modifier key.
    pub key: String,
    /// Human-readable label; not interpreted.
    #[serde(default)]
    pub action: String,
}

impl Default for ShortcutDescriptor {
    fn default() -> Self {
        Self::toggle_app_default()
    }
}

impl ShortcutDescriptor {
    /// The factory binding for showing/hiding the app: `ctrl+alt+v`.
    pub fn toggle_app_default() -> Self {
        Self {
            modifiers: vec!["ctrl".to_string(), "alt".to_string()],
            key: "v".to_string(),
            action: TOGGLE_APP_ACTION.to_string(),
        }
    }

    /// Build a descriptor from a parsed chord.
    pub fn from_chord(chord: &Chord, action: &str) -> Self {
        Self {
            modifiers: chord
                .modifiers
                .iter()
                .map(|m| m.to_spec().to_string())
                .collect(),
            key: chord.key.clone(),
            action: action.to_string(),
        }
    }

    /// Convert to a typed chord. Returns `None` unless the descriptor is valid.
    pub fn to_chord(&self) -> Option<Chord> {
        if !self.is_valid() {
            return None;
        }
        let mods: Vec<Modifier> = self
            .modifiers
            .iter()
            .filter_map(|m| Modifier::from_spec(m))
            .collect();
        Some(Chord::new(mods, &self.key))
    }

    /// A descriptor is valid when it has at least one recognised modifier and
    /// a non-empty key that is not itself a modifier.
    pub fn is_valid(&self) -> bool {
        !self.modifiers.is_empty()
            && self
                .modifiers
                .iter()
                .all(|m| Modifier::from_spec(m).is_some())
            && !self.key.trim().is_empty()
            && !is_modifier_key(&self.key)
    }

    /// Render for display, e.g. `Ctrl + Shift + V`.
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = self.modifiers.iter().map(|m| display_modifier(m)).collect();
        parts.push(self.key.to_uppercase());
        parts.join(" + ")
    }
}

/// All configurable shortcuts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ShortcutConfigs {
    /// Show/hide the main window.
    #[serde(default)]
    pub toggle_app: ShortcutDescriptor,
}

/// Preferences returned by `get_user_preferences`.
///
/// The backend sends more fields than this; the client only reads the ones it
/// edits and ignores the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPreferences {
    /// Copy a selected meme to the system clipboard.
    #[serde(default = "default_true")]
    pub copy_to_clipboard: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            copy_to_clipboard: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// One search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemeItem {
    /// Backend identifier.
    pub id: String,
    /// Image location; passed back to `copy_image_to_clipboard`.
    pub url: String,
    /// Optional caption.
    #[serde(default)]
    pub description: Option<String>,
}

/// Community manifest listing third-party meme packs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CommunityManifest {
    /// Manifest header.
    pub community_info: CommunityInfo,
    /// Packs keyed by uuid.
    #[serde(default)]
    pub meme_libs: BTreeMap<String, MemeLib>,
}

/// Manifest header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CommunityInfo {
    /// Base url for pack resources.
    #[serde(default)]
    pub resource_url: String,
    /// Where the manifest itself is refreshed from.
    #[serde(default)]
    pub update_url: String,
    /// Unix timestamp of the manifest build.
    pub timestamp: u64,
}

/// A single community meme pack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MemeLib {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub update_url: String,
    pub uuid: String,
}

/// Set of enabled pack uuids.
pub type EnabledLibs = BTreeSet<String>;

/// A named backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiUrl {
    /// Display name.
    pub name: String,
    /// Base url.
    pub url: String,
}

/// Configured endpoints plus the one in use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ApiUrlConfig {
    /// Known endpoints, in display order.
    #[serde(default)]
    pub urls: Vec<ApiUrl>,
    /// Index of the endpoint in use.
    #[serde(default)]
    pub active_index: usize,
}

impl ApiUrlConfig {
    /// The endpoint currently in use, falling back to the first one when the
    /// stored index is out of range.
    pub fn active(&self) -> Option<&ApiUrl> {
        self.urls.get(self.active_index).or_else(|| self.urls.first())
    }
}

/// Notification level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    /// Something went wrong.
    Error,
    /// An operation completed.
    Success,
}

/// Where a transient message is displayed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Application-wide toast.
    App,
    /// Inline messages in the settings panel.
    Settings,
}

/// Messages emitted by the client core towards the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum UiMsg {
    /// A transient message became visible (or replaced the previous one).
    Notify {
        /// Where to show it.
        surface: Surface,
        /// Error or success.
        kind: NotifyKind,
        /// Message text.
        text: String,
    },
    /// The message of `kind` on `surface` expired or was dismissed.
    NotifyCleared {
        /// Surface that was cleared.
        surface: Surface,
        /// Kind of the message that disappeared.
        kind: NotifyKind,
    },
    /// The user picked a meme; sibling views may react.
    MemeSelected(MemeItem),
    /// Unrecoverable error; the UI should show the fatal panel.
    Fatal(String),
    /// The application state was reset after a reload.
    Reloaded,
}

/// Channel helpers for UI messages.
pub mod ipc {
    use super::UiMsg;

    /// Tokio unbounded sender for UI messages.
    pub type UiTx = tokio::sync::mpsc::UnboundedSender<UiMsg>;
    /// Tokio unbounded receiver for UI messages.
    pub type UiRx = tokio::sync::mpsc::UnboundedReceiver<UiMsg>;

    /// Create a standard unbounded UI channel (sender, receiver).
    pub fn ui_channel() -> (UiTx, UiRx) {
        tokio::sync::mpsc::unbounded_channel::<UiMsg>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toggle_is_ctrl_alt_v() {
        let d = ShortcutDescriptor::default();
        assert_eq!(d.modifiers, vec!["ctrl", "alt"]);
        assert_eq!(d.key, "v");
        assert!(d.is_valid());
        assert_eq!(d.display(), "Ctrl + Alt + V");
    }

    #[test]
    fn validity() {
        let mut d = ShortcutDescriptor::default();
        d.modifiers.clear();
        assert!(!d.is_valid());

        let d = ShortcutDescriptor {
            modifiers: vec!["ctrl".into()],
            key: "shift".into(),
            action: String::new(),
        };
        assert!(!d.is_valid());
        assert!(d.to_chord().is_none());
    }

    #[test]
    fn display_upcases_unknown_modifiers() {
        let d = ShortcutDescriptor {
            modifiers: vec!["hyper".into(), "shift".into()],
            key: "f5".into(),
            action: String::new(),
        };
        assert_eq!(d.display(), "HYPER + Shift + F5");
    }

    #[test]
    fn preferences_ignore_extra_backend_fields() {
        let raw = r#"{"copy_to_clipboard": false, "shortcuts": {}, "api_urls": {"urls": []}}"#;
        let prefs: UserPreferences = serde_json::from_str(raw).expect("decode");
        assert!(!prefs.copy_to_clipboard);
    }

    #[test]
    fn shortcut_configs_wire_shape() {
        let cfg = ShortcutConfigs::default();
        let v = serde_json::to_value(&cfg).expect("encode");
        assert_eq!(v["toggle_app"]["key"], "v");
        assert_eq!(v["toggle_app"]["modifiers"][1], "alt");
    }

    #[test]
    fn active_api_url_falls_back() {
        let cfg = ApiUrlConfig {
            urls: vec![ApiUrl {
                name: "default".into(),
                url: "https://example.invalid".into(),
            }],
            active_index: 4,
        };
        assert_eq!(cfg.active().map(|u| u.name.as_str()), Some("default"));
    }
}
