// PasteKeys Settings
// User-configurable options delivered by the storage provider

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::key::{Key, KeyLocation};

/// Popup color theme. Carried through the settings record for the UI
/// surfaces; the engine itself never reads it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum ColorTheme {
    #[default]
    System,
    Light,
    Dark,
}

/// User settings the engine consults.
///
/// The two combination keys are expected to be distinct when both are set;
/// the engine does not enforce that and tolerates either being `None`
/// (the corresponding mode is simply disabled).
///
/// A stored record with missing fields deserializes with those fields
/// disabled rather than defaulted; `Settings::default()` applies only when
/// no record was stored at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub color_theme: ColorTheme,
    #[serde(default)]
    pub insert_combination_key: Option<Key>,
    #[serde(default)]
    pub paste_combination_key: Option<Key>,
    #[serde(default)]
    pub insert_into_password_field: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color_theme: ColorTheme::System,
            insert_combination_key: Some(Key::new("F8", "F8", KeyLocation::Standard)),
            paste_combination_key: None,
            insert_into_password_field: false,
        }
    }
}

fn function_key(name: &str) -> Key {
    Key::new(name, name, KeyLocation::Standard)
}

/// Function keys eligible as combination keys.
///
/// These sit out of the way of typing and are rarely claimed by pages,
/// which makes them safe to hold as mode triggers.
pub fn allowed_combination_keys() -> &'static [Key] {
    static KEYS: OnceLock<Vec<Key>> = OnceLock::new();
    KEYS.get_or_init(|| {
        ["F2", "F4", "F8", "F9"]
            .into_iter()
            .map(function_key)
            .collect()
    })
}

/// Whether the key may carry a binding at all.
///
/// Reserved keys either arm modes themselves, move focus, or are swallowed
/// by the browser before the page sees them; binding text to them would
/// never fire or would fight the chrome.
pub fn is_reserved_key(key: &Key) -> bool {
    static KEYS: OnceLock<Vec<Key>> = OnceLock::new();
    let reserved = KEYS.get_or_init(|| {
        let mut keys = vec![
            Key::new("Tab", "Tab", KeyLocation::Standard),
            Key::new("CapsLock", "CapsLock", KeyLocation::Standard),
            Key::new("Shift", "ShiftLeft", KeyLocation::Left),
            Key::new("Shift", "ShiftRight", KeyLocation::Right),
            Key::new("Control", "ControlLeft", KeyLocation::Left),
            Key::new("Control", "ControlRight", KeyLocation::Right),
            Key::new("Alt", "AltLeft", KeyLocation::Left),
            Key::new("AltGraph", "AltRight", KeyLocation::Right),
            Key::new("Escape", "Escape", KeyLocation::Standard),
        ];
        keys.extend((1..=12).map(|n| function_key(&format!("F{}", n))));
        keys
    });
    reserved.iter().any(|reserved| reserved == key)
}
