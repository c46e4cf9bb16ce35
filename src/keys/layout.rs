//! Physical-key canonicalization and combo strings.
//!
//! Bindings key off the physical key position, not the character it would
//! produce, so the same key matches the same binding on any keyboard layout
//! and regardless of shift state. Physical codes arrive as the platform's
//! `KeyboardEvent.code` names ("KeyA", "Digit3", "ArrowUp", ...).

use serde::{Deserialize, Serialize};

/// One raw keydown as delivered by the page bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    /// Physical code, e.g. "KeyQ" or "Digit4".
    pub code: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyInput {
    /// Canonical combo string for this event, or `None` when the physical
    /// key has no canonical name. Modifiers appear lowercase in the fixed
    /// prefix order ctrl, alt, shift, meta.
    pub fn combo(&self) -> Option<String> {
        let key = canonical_key(&self.code)?;
        let mut combo = String::new();
        if self.ctrl {
            combo.push_str("ctrl+");
        }
        if self.alt {
            combo.push_str("alt+");
        }
        if self.shift {
            combo.push_str("shift+");
        }
        if self.meta {
            combo.push_str("meta+");
        }
        combo.push_str(&key);
        Some(combo)
    }
}

/// Map a physical code to its canonical binding name.
///
/// Unrecognized codes return `None`; the gate leaves those events to the
/// browser's default handling.
pub fn canonical_key(code: &str) -> Option<String> {
    if let Some(letter) = code.strip_prefix("Key") {
        let mut chars = letter.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(c.to_ascii_lowercase().to_string());
            }
        }
        return None;
    }
    if let Some(digit) = code.strip_prefix("Digit") {
        let mut chars = digit.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_digit() {
                return Some(c.to_string());
            }
        }
        return None;
    }
    if let Some(n) = code.strip_prefix('F') {
        if matches!(n.parse::<u8>(), Ok(1..=12)) {
            return Some(code.to_ascii_lowercase());
        }
        return None;
    }

    let name = match code {
        "ArrowUp" => "up",
        "ArrowDown" => "down",
        "ArrowLeft" => "left",
        "ArrowRight" => "right",
        "Space" => "space",
        "Enter" => "enter",
        "Escape" => "escape",
        "Tab" => "tab",
        "Backspace" => "backspace",
        "Delete" => "delete",
        "Home" => "home",
        "End" => "end",
        "PageUp" => "pageup",
        "PageDown" => "pagedown",
        "Minus" => "-",
        "Equal" => "=",
        "BracketLeft" => "[",
        "BracketRight" => "]",
        "Semicolon" => ";",
        "Quote" => "'",
        "Backquote" => "`",
        "Backslash" => "\\",
        "Comma" => ",",
        "Period" => ".",
        "Slash" => "/",
        _ => return None,
    };
    Some(name.to_string())
}
