// PasteKeys Storage Snapshots
// TOML-backed settings and binding persistence

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bindings::{KeyBinding, KeyBindings};
use crate::settings::{self, Settings};

/// Change notification from the storage layer.
///
/// Either half may arrive independently; the engine applies whichever is
/// present and leaves the other snapshot untouched.
#[derive(Debug, Clone, Default)]
pub struct SnapshotUpdate {
    pub settings: Option<Settings>,
    pub bindings: Option<KeyBindings>,
}

impl SnapshotUpdate {
    pub fn settings(settings: Settings) -> Self {
        Self {
            settings: Some(settings),
            bindings: None,
        }
    }

    pub fn bindings(bindings: KeyBindings) -> Self {
        Self {
            settings: None,
            bindings: Some(bindings),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_none() && self.bindings.is_none()
    }
}

/// Errors that can occur when loading a stored snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("no source path to reload from")]
    NoSourcePath,
}

/// Serialized form of one stored snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SnapshotToml {
    settings: Option<Settings>,
    bindings: Option<Vec<KeyBinding>>,
}

/// File-backed snapshot store.
///
/// Loads the `(Settings, KeyBindings)` pair the engine consumes. An absent
/// settings table or file yields defaults; an absent bindings list yields
/// an empty table. The store validates nothing beyond the TOML shape — it
/// warns about suspicious keys but preserves them.
#[derive(Debug, Clone, Default)]
pub struct SnapshotFile {
    settings: Settings,
    bindings: KeyBindings,
    source_path: Option<PathBuf>,
}

impl SnapshotFile {
    /// A snapshot holding the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SnapshotError> {
        let parsed: SnapshotToml =
            toml::from_str(content).map_err(|e| SnapshotError::TomlParse(e.to_string()))?;

        let snapshot = Self {
            settings: parsed.settings.unwrap_or_default(),
            bindings: KeyBindings::from_entries(parsed.bindings.unwrap_or_default()),
            source_path: None,
        };
        snapshot.warn_on_suspicious_keys();
        Ok(snapshot)
    }

    /// Load a snapshot from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(&path)?;
        let mut snapshot = Self::from_toml(&content)?;
        snapshot.source_path = Some(path.as_ref().to_path_buf());
        Ok(snapshot)
    }

    /// The default snapshot path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pastekeys").join("pastekeys.toml"))
    }

    /// Load from the default location, falling back to built-in defaults
    /// when no file exists there.
    pub fn load_default() -> Result<Self, SnapshotError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::new())
    }

    /// Re-read the snapshot from its original file and return the full
    /// change notification.
    pub fn reload(&mut self) -> Result<SnapshotUpdate, SnapshotError> {
        let path = self.source_path.clone().ok_or(SnapshotError::NoSourcePath)?;
        *self = Self::from_file(path)?;
        Ok(self.initial_update())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// The load-time notification carrying both halves.
    pub fn initial_update(&self) -> SnapshotUpdate {
        SnapshotUpdate {
            settings: Some(self.settings.clone()),
            bindings: Some(self.bindings.clone()),
        }
    }

    fn warn_on_suspicious_keys(&self) {
        for combination in [
            self.settings.insert_combination_key.as_ref(),
            self.settings.paste_combination_key.as_ref(),
        ]
        .into_iter()
        .flatten()
        {
            if !settings::allowed_combination_keys().contains(combination) {
                log::warn!(
                    "combination key {} is outside the supported set",
                    combination.display()
                );
            }
        }
        for (key, _) in self.bindings.iter() {
            if settings::is_reserved_key(key) {
                log::warn!("binding on reserved key {} will never fire", key.display());
            }
        }
    }
}

/// Starter snapshot content for a new installation.
pub fn default_snapshot_content() -> &'static str {
    r#"# PasteKeys Snapshot
# Settings and key bindings consumed by the engine.
# Place this file at: ~/.config/pastekeys/pastekeys.toml

[settings]
# "System", "Light" or "Dark"
color_theme = "System"

# Hold this key to insert bound snippets directly into the focused field.
# Supported combination keys: F2, F4, F8, F9. Remove the table to disable.
[settings.insert_combination_key]
label = "F8"
code = "F8"
location = 0

# Uncomment to stage snippets on the clipboard instead while held.
# [settings.paste_combination_key]
# label = "F4"
# code = "F4"
# location = 0

# Each binding pairs a key with the text it inserts.
[[bindings]]
text = "hello world"
[bindings.key]
label = "1"
code = "Numpad1"
location = 3
"#
}
