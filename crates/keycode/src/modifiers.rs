use serde::{Deserialize, Serialize};

/// Modifier keys a shortcut may combine with its key.
///
/// Variant order is the canonical display and storage order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Control,
    Alt,
    Shift,
    Meta,
}

impl Modifier {
    /// All modifiers in canonical order.
    pub const ALL: [Self; 4] = [Self::Control, Self::Alt, Self::Shift, Self::Meta];

    /// Parses a modifier name.
    ///
    /// Case-insensitive; accepts the canonical spec names plus the common
    /// aliases delivered by different keyboards and platforms
    /// (control, option/opt, super/cmd/command/win/os).
    pub fn from_spec(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::Control),
            "alt" | "opt" | "option" => Some(Self::Alt),
            "shift" => Some(Self::Shift),
            "meta" | "super" | "cmd" | "command" | "win" | "os" => Some(Self::Meta),
            _ => None,
        }
    }

    /// Returns the canonical spec string for this modifier, always lowercased.
    pub fn to_spec(self) -> &'static str {
        match self {
            Self::Control => "ctrl",
            Self::Alt => "alt",
            Self::Shift => "shift",
            Self::Meta => "meta",
        }
    }

    /// Human-facing label used in shortcut previews.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Control => "Ctrl",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Meta => "Meta",
        }
    }
}

/// Render a stored modifier name for display.
///
/// Known names map to their display label; anything else is upper-cased
/// verbatim so hand-edited preference files still render.
pub fn display_modifier(name: &str) -> String {
    match Modifier::from_spec(name) {
        Some(m) => m.display_name().to_string(),
        None => name.to_uppercase(),
    }
}

/// True when a raw key name denotes a modifier key on its own.
pub fn is_modifier_key(key: &str) -> bool {
    Modifier::from_spec(key).is_some() || key.eq_ignore_ascii_case("altgraph")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_specs() {
        assert_eq!(Modifier::from_spec("ctrl"), Some(Modifier::Control));
        assert_eq!(Modifier::from_spec("Control"), Some(Modifier::Control));
        assert_eq!(Modifier::from_spec("opt"), Some(Modifier::Alt));
        assert_eq!(Modifier::from_spec("Command"), Some(Modifier::Meta));
        assert_eq!(Modifier::from_spec("v"), None);

        for m in Modifier::ALL {
            assert_eq!(Modifier::from_spec(m.to_spec()), Some(m));
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(display_modifier("ctrl"), "Ctrl");
        assert_eq!(display_modifier("super"), "Meta");
        assert_eq!(display_modifier("hyper"), "HYPER");
    }

    #[test]
    fn modifier_keys() {
        assert!(is_modifier_key("Shift"));
        assert!(is_modifier_key("Meta"));
        assert!(is_modifier_key("AltGraph"));
        assert!(!is_modifier_key("v"));
        assert!(!is_modifier_key("F5"));
    }
}
