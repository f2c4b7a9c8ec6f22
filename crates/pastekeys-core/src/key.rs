// PasteKeys Key Type
// Normalized identity of a physical key press

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Physical location of a key on the keyboard.
///
/// Matches the numeric location values reported by host key events:
/// 0 standard, 1 left-hand variant, 2 right-hand variant, 3 keypad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum KeyLocation {
    #[default]
    Standard = 0,
    Left = 1,
    Right = 2,
    Keypad = 3,
}

impl From<KeyLocation> for u8 {
    fn from(location: KeyLocation) -> Self {
        location as u8
    }
}

impl TryFrom<u8> for KeyLocation {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(KeyLocation::Standard),
            1 => Ok(KeyLocation::Left),
            2 => Ok(KeyLocation::Right),
            3 => Ok(KeyLocation::Keypad),
            _ => Err(format!("Unknown key location: {}", value)),
        }
    }
}

/// Normalized, comparable identity of a physical key.
///
/// Equality is structural on all three fields: the same logical key can
/// appear at different physical locations (left vs right Shift, keypad vs
/// top-row digits) and those presses must stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    label: String,
    code: String,
    #[serde(default)]
    location: KeyLocation,
}

impl Key {
    /// Create a key from the label, code, and location of a raw key event.
    pub fn new(label: impl Into<String>, code: impl Into<String>, location: KeyLocation) -> Self {
        Self {
            label: label.into(),
            code: code.into(),
            location,
        }
    }

    /// The key's label as the host reported it (e.g. "a", "Shift", " ").
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The key's positional code (e.g. "KeyA", "ShiftLeft", "Numpad1").
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Where the key sits on the keyboard.
    pub fn location(&self) -> KeyLocation {
        self.location
    }

    /// User-facing name of the key.
    ///
    /// Keypad keys and the space bar have labels that are ambiguous or
    /// invisible, so those show their code instead. This governs display
    /// only, never matching.
    pub fn display(&self) -> &str {
        if self.location == KeyLocation::Keypad || self.label == " " {
            &self.code
        } else {
            &self.label
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        key_from_name(s).ok_or_else(|| format!("Unknown key: {}", s))
    }
}

/// Resolve a human-readable key name to a canonical `Key`.
///
/// Accepts letters ("a"), digits ("7"), function keys ("F9"), keypad names
/// ("KP4", "KPEnter"), sided modifiers ("ShiftLeft", "ControlRight"), and
/// common named keys ("Enter", "Space", "Escape"). Named keys are matched
/// case-insensitively.
pub fn key_from_name(name: &str) -> Option<Key> {
    let name = name.trim();

    // Single letters and digits
    if name.len() == 1 {
        let c = name.chars().next()?;
        if c.is_ascii_alphabetic() {
            let lower = c.to_ascii_lowercase();
            return Some(Key::new(
                lower.to_string(),
                format!("Key{}", c.to_ascii_uppercase()),
                KeyLocation::Standard,
            ));
        }
        if c.is_ascii_digit() {
            return Some(Key::new(
                c.to_string(),
                format!("Digit{}", c),
                KeyLocation::Standard,
            ));
        }
        return None;
    }

    // Function keys F1..F24 share label and code
    if let Some(digits) = name.strip_prefix('F').or_else(|| name.strip_prefix('f')) {
        if let Ok(n) = digits.parse::<u8>() {
            if (1..=24).contains(&n) {
                let fkey = format!("F{}", n);
                return Some(Key::new(fkey.clone(), fkey, KeyLocation::Standard));
            }
        }
    }

    // Keypad digits KP0..KP9
    if let Some(digit) = name
        .strip_prefix("KP")
        .filter(|rest| rest.len() == 1 && rest.chars().all(|c| c.is_ascii_digit()))
    {
        return Some(Key::new(
            digit,
            format!("Numpad{}", digit),
            KeyLocation::Keypad,
        ));
    }

    let named = match name.to_ascii_lowercase().as_str() {
        "enter" => ("Enter", "Enter", KeyLocation::Standard),
        "tab" => ("Tab", "Tab", KeyLocation::Standard),
        "space" => (" ", "Space", KeyLocation::Standard),
        "escape" | "esc" => ("Escape", "Escape", KeyLocation::Standard),
        "backspace" => ("Backspace", "Backspace", KeyLocation::Standard),
        "delete" => ("Delete", "Delete", KeyLocation::Standard),
        "insert" => ("Insert", "Insert", KeyLocation::Standard),
        "home" => ("Home", "Home", KeyLocation::Standard),
        "end" => ("End", "End", KeyLocation::Standard),
        "pageup" => ("PageUp", "PageUp", KeyLocation::Standard),
        "pagedown" => ("PageDown", "PageDown", KeyLocation::Standard),
        "arrowup" | "up" => ("ArrowUp", "ArrowUp", KeyLocation::Standard),
        "arrowdown" | "down" => ("ArrowDown", "ArrowDown", KeyLocation::Standard),
        "arrowleft" | "left" => ("ArrowLeft", "ArrowLeft", KeyLocation::Standard),
        "arrowright" | "right" => ("ArrowRight", "ArrowRight", KeyLocation::Standard),
        "capslock" => ("CapsLock", "CapsLock", KeyLocation::Standard),
        "shiftleft" => ("Shift", "ShiftLeft", KeyLocation::Left),
        "shiftright" => ("Shift", "ShiftRight", KeyLocation::Right),
        "controlleft" | "ctrlleft" => ("Control", "ControlLeft", KeyLocation::Left),
        "controlright" | "ctrlright" => ("Control", "ControlRight", KeyLocation::Right),
        "altleft" => ("Alt", "AltLeft", KeyLocation::Left),
        "altright" => ("AltGraph", "AltRight", KeyLocation::Right),
        "metaleft" => ("Meta", "MetaLeft", KeyLocation::Left),
        "metaright" => ("Meta", "MetaRight", KeyLocation::Right),
        "kpenter" => ("Enter", "NumpadEnter", KeyLocation::Keypad),
        "kpdot" => (".", "NumpadDecimal", KeyLocation::Keypad),
        "kpplus" => ("+", "NumpadAdd", KeyLocation::Keypad),
        "kpminus" => ("-", "NumpadSubtract", KeyLocation::Keypad),
        "kpasterisk" => ("*", "NumpadMultiply", KeyLocation::Keypad),
        "kpslash" => ("/", "NumpadDivide", KeyLocation::Keypad),
        _ => return None,
    };

    let (label, code, location) = named;
    Some(Key::new(label, code, location))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equality_structural() {
        let a = Key::new("a", "KeyA", KeyLocation::Standard);
        let b = Key::new("a", "KeyA", KeyLocation::Standard);
        let c = Key::new("a", "KeyQ", KeyLocation::Standard);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_ne!(a, c);
    }

    #[test]
    fn test_key_equality_distinguishes_location() {
        let left = Key::new("Shift", "ShiftLeft", KeyLocation::Left);
        let right = Key::new("Shift", "ShiftRight", KeyLocation::Right);
        assert_ne!(left, right);
    }

    #[test]
    fn test_key_clone_detached() {
        let key = Key::new("F9", "F9", KeyLocation::Standard);
        let copy = key.clone();
        assert_eq!(key, copy);
    }

    #[test]
    fn test_display_prefers_label() {
        let key = Key::new("a", "KeyA", KeyLocation::Standard);
        assert_eq!(key.display(), "a");
    }

    #[test]
    fn test_display_uses_code_for_keypad() {
        let key = Key::new("1", "Numpad1", KeyLocation::Keypad);
        assert_eq!(key.display(), "Numpad1");
    }

    #[test]
    fn test_display_uses_code_for_space() {
        let key = Key::new(" ", "Space", KeyLocation::Standard);
        assert_eq!(key.display(), "Space");
    }

    #[test]
    fn test_key_from_name_letters_and_digits() {
        assert_eq!(
            key_from_name("a"),
            Some(Key::new("a", "KeyA", KeyLocation::Standard))
        );
        assert_eq!(
            key_from_name("Q"),
            Some(Key::new("q", "KeyQ", KeyLocation::Standard))
        );
        assert_eq!(
            key_from_name("7"),
            Some(Key::new("7", "Digit7", KeyLocation::Standard))
        );
    }

    #[test]
    fn test_key_from_name_function_keys() {
        assert_eq!(
            key_from_name("F9"),
            Some(Key::new("F9", "F9", KeyLocation::Standard))
        );
        assert_eq!(key_from_name("F25"), None);
        assert_eq!(key_from_name("F0"), None);
    }

    #[test]
    fn test_key_from_name_keypad() {
        assert_eq!(
            key_from_name("KP4"),
            Some(Key::new("4", "Numpad4", KeyLocation::Keypad))
        );
        assert_eq!(
            key_from_name("KPEnter"),
            Some(Key::new("Enter", "NumpadEnter", KeyLocation::Keypad))
        );
    }

    #[test]
    fn test_key_from_name_sided_modifiers() {
        assert_eq!(
            key_from_name("ShiftLeft"),
            Some(Key::new("Shift", "ShiftLeft", KeyLocation::Left))
        );
        assert_eq!(
            key_from_name("ControlRight"),
            Some(Key::new("Control", "ControlRight", KeyLocation::Right))
        );
    }

    #[test]
    fn test_key_from_name_unknown() {
        assert_eq!(key_from_name("NoSuchKey"), None);
        assert_eq!(key_from_name(""), None);
    }

    #[test]
    fn test_key_from_str() {
        let key: Key = "F2".parse().unwrap();
        assert_eq!(key, Key::new("F2", "F2", KeyLocation::Standard));
        assert!("bogus".parse::<Key>().is_err());
    }

    #[test]
    fn test_location_round_trip() {
        for raw in 0u8..=3 {
            let location = KeyLocation::try_from(raw).unwrap();
            assert_eq!(u8::from(location), raw);
        }
        assert!(KeyLocation::try_from(4).is_err());
    }
}
