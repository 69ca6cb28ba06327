//! Typed RPC definitions for the backend surface.
//!
//! Method names are the wire contract with the backend process and must not
//! change.

/// Operations the client may invoke on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Load `{copy_to_clipboard}`.
    GetUserPreferences,
    /// Load `{toggle_app}`.
    GetShortcuts,
    /// Persist the clipboard toggle: `{enabled}`.
    SetCopyToClipboard,
    /// Persist shortcuts: `{shortcuts}`.
    SetShortcuts,
    /// Re-register hotkeys from the persisted configuration.
    RefreshShortcuts,
    /// Keyword search: `{keyword}`.
    SearchMemes,
    /// Copy an image to the clipboard: `{imageUrl}`.
    CopyImageToClipboard,
    /// Community manifest, cache first.
    FetchCommunityManifest,
    /// Community manifest, forced network refresh.
    RefreshCommunityManifest,
    /// Uuids of enabled packs.
    GetEnabledMemeLibs,
    /// Enable a pack: `{uuid}`.
    EnableMemeLib,
    /// Disable a pack: `{uuid}`.
    DisableMemeLib,
    /// Endpoint list and active index.
    GetApiUrlConfig,
    /// Append an endpoint: `{name, url}`.
    AddApiUrl,
    /// Remove an endpoint: `{index}`.
    RemoveApiUrl,
    /// Select the endpoint in use: `{index}`.
    SetActiveApiUrl,
}

impl Method {
    /// Every method, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::GetUserPreferences,
        Self::GetShortcuts,
        Self::SetCopyToClipboard,
        Self::SetShortcuts,
        Self::RefreshShortcuts,
        Self::SearchMemes,
        Self::CopyImageToClipboard,
        Self::FetchCommunityManifest,
        Self::RefreshCommunityManifest,
        Self::GetEnabledMemeLibs,
        Self::EnableMemeLib,
        Self::DisableMemeLib,
        Self::GetApiUrlConfig,
        Self::AddApiUrl,
        Self::RemoveApiUrl,
        Self::SetActiveApiUrl,
    ];

    /// Stable wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetUserPreferences => "get_user_preferences",
            Self::GetShortcuts => "get_shortcuts",
            Self::SetCopyToClipboard => "set_copy_to_clipboard",
            Self::SetShortcuts => "set_shortcuts",
            Self::RefreshShortcuts => "refresh_shortcuts",
            Self::SearchMemes => "search_memes",
            Self::CopyImageToClipboard => "copy_image_to_clipboard",
            Self::FetchCommunityManifest => "fetch_community_manifest",
            Self::RefreshCommunityManifest => "refresh_community_manifest",
            Self::GetEnabledMemeLibs => "get_enabled_meme_libs",
            Self::EnableMemeLib => "enable_meme_lib",
            Self::DisableMemeLib => "disable_meme_lib",
            Self::GetApiUrlConfig => "get_api_url_config",
            Self::AddApiUrl => "add_api_url",
            Self::RemoveApiUrl => "remove_api_url",
            Self::SetActiveApiUrl => "set_active_api_url",
        }
    }

    /// Parse a wire name.
    pub fn try_from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

/// Name of the inbound hotkey registration failure event.
pub const SHORTCUT_REGISTRATION_FAILED: &str = "shortcut-registration-failed";

/// Events pushed by the backend without a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// The backend could not register the configured global hotkey.
    ShortcutRegistrationFailed(String),
}

impl BackendEvent {
    /// Stable wire name for this event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortcutRegistrationFailed(_) => SHORTCUT_REGISTRATION_FAILED,
        }
    }

    /// Build an event from its wire name and string payload.
    pub fn from_wire(name: &str, payload: String) -> Option<Self> {
        match name {
            SHORTCUT_REGISTRATION_FAILED => Some(Self::ShortcutRegistrationFailed(payload)),
            _ => None,
        }
    }
}
