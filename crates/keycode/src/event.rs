use crate::{Modifier, is_modifier_key};

/// A raw key-down event as delivered by the UI layer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeyEvent {
    /// Key name (web `KeyboardEvent.key` vocabulary, any case).
    pub key: String,
    /// Control held.
    pub ctrl: bool,
    /// Alt/Option held.
    pub alt: bool,
    /// Shift held.
    pub shift: bool,
    /// Meta/Command/Super held.
    pub meta: bool,
}

impl KeyEvent {
    /// A key press with no modifiers held.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper marking `m` as held.
    pub fn with(mut self, m: Modifier) -> Self {
        match m {
            Modifier::Control => self.ctrl = true,
            Modifier::Alt => self.alt = true,
            Modifier::Shift => self.shift = true,
            Modifier::Meta => self.meta = true,
        }
        self
    }

    /// Modifiers held during this event, in canonical order.
    pub fn held_modifiers(&self) -> Vec<Modifier> {
        Modifier::ALL
            .into_iter()
            .filter(|m| match m {
                Modifier::Control => self.ctrl,
                Modifier::Alt => self.alt,
                Modifier::Shift => self.shift,
                Modifier::Meta => self.meta,
            })
            .collect()
    }

    /// True when the pressed key is itself a modifier.
    pub fn is_modifier(&self) -> bool {
        is_modifier_key(&self.key)
    }

    /// The pressed key in normalized spec form.
    pub fn key_spec(&self) -> String {
        normalize_key(&self.key)
    }
}

/// Normalize a key name to its stored form: lower-cased, with the literal
/// space character spelled out.
pub fn normalize_key(key: &str) -> String {
    if key == " " {
        return "space".to_string();
    }
    match key.trim().to_lowercase().as_str() {
        "spacebar" => "space".to_string(),
        other => other.to_string(),
    }
}
