use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Modifier, event::normalize_key, is_modifier_key};

/// A key chord: a set of modifiers plus a single non-modifier key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    /// Modifiers held for this chord, canonical order, no duplicates.
    pub modifiers: Vec<Modifier>,
    /// The non-modifier key, normalized.
    pub key: String,
}

impl Chord {
    /// Build a chord, sorting and deduplicating the modifiers.
    pub fn new(mut modifiers: Vec<Modifier>, key: &str) -> Self {
        modifiers.sort();
        modifiers.dedup();
        Self {
            modifiers,
            key: normalize_key(key),
        }
    }

    /// Parses a chord written as "ctrl+shift+v".
    ///
    /// - Case-insensitive for both modifiers and the key.
    /// - Components are separated by "+"; the last component is the key.
    /// - The plus key itself is written as a trailing "+", as in "ctrl++".
    /// - Fails when a modifier is unknown, the key is empty, or the key is
    ///   itself a modifier.
    pub fn parse(s: &str) -> Option<Self> {
        let (mods, key) = match s.strip_suffix("++") {
            Some(mods) => (Some(mods), "+"),
            None if s == "+" => (None, "+"),
            None => match s.rsplit_once('+') {
                Some((mods, key)) => (Some(mods), key),
                None => (None, s),
            },
        };
        let key = if key == " " { " " } else { key.trim() };
        if key.is_empty() || is_modifier_key(key) {
            return None;
        }
        let mut modifiers = Vec::new();
        if let Some(mods) = mods {
            for m in mods.split('+') {
                modifiers.push(Modifier::from_spec(m)?);
            }
        }
        Some(Self::new(modifiers, key))
    }

    /// True when the chord carries at least one modifier.
    pub fn has_modifier(&self) -> bool {
        !self.modifiers.is_empty()
    }

    /// Returns the canonical spec form, e.g. `ctrl+alt+v`.
    pub fn to_spec(&self) -> String {
        let mut out: Vec<&str> = self.modifiers.iter().map(|m| m.to_spec()).collect();
        out.push(&self.key);
        out.join("+")
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_spec())
    }
}
