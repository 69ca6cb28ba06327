//! keycode: key names, modifiers and chords for MemeMeow shortcuts.
//!
//! - `Modifier`: the four modifiers a shortcut may use, with spec and
//!   display names.
//! - `KeyEvent`: a raw key-down as delivered by the UI layer.
//! - `Chord`: a set of modifiers plus a single non-modifier key, parsed from
//!   and rendered to `ctrl+shift+v` style specs.
//!
//! Key names follow the web `KeyboardEvent.key` vocabulary, lower-cased.

mod modifiers;
pub use modifiers::{Modifier, display_modifier, is_modifier_key};

mod event;
pub use event::{KeyEvent, normalize_key};

mod chord;
pub use chord::Chord;
