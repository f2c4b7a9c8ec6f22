// PasteKeys Binding Table
// Insertion-ordered mapping from key identity to snippet text

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Key;

/// A single key-to-snippet association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: Key,
    pub text: String,
}

impl KeyBinding {
    pub fn new(key: Key, text: impl Into<String>) -> Self {
        Self {
            key,
            text: text.into(),
        }
    }
}

/// Ordered table of key bindings, unique by key identity.
///
/// Order is kept for display purposes; lookup goes through the key index.
/// The engine holds this behind a read-only reference that is replaced
/// wholesale on storage changes, so the mutating operations here only run
/// on the storage provider's side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<KeyBinding>", into = "Vec<KeyBinding>")]
pub struct KeyBindings {
    entries: IndexMap<Key, String>,
}

impl KeyBindings {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from bindings in order. Later entries for the same key
    /// replace earlier text without moving the entry.
    pub fn from_entries(entries: impl IntoIterator<Item = KeyBinding>) -> Self {
        let mut bindings = Self::new();
        for binding in entries {
            bindings.insert(binding);
        }
        bindings
    }

    /// The text bound to the key, if any.
    pub fn get_text(&self, key: &Key) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the key carries a binding.
    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Display position of the key's binding, if bound.
    pub fn index_of(&self, key: &Key) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    /// Upsert: replaces the text in place when the key is already bound,
    /// appends otherwise.
    pub fn insert(&mut self, binding: KeyBinding) {
        self.entries.insert(binding.key, binding.text);
    }

    /// Positional insert. Refuses (returns false, no mutation) when the key
    /// is already bound; an index past the end appends.
    pub fn insert_at(&mut self, index: usize, binding: KeyBinding) -> bool {
        if self.contains(&binding.key) {
            return false;
        }
        let index = index.min(self.entries.len());
        self.entries.shift_insert(index, binding.key, binding.text);
        true
    }

    /// Remove the key's binding, preserving the order of the rest. Returns
    /// whether it was present.
    pub fn remove(&mut self, key: &Key) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    /// Remove the binding at a display position. Returns false without
    /// mutating when the index is out of range.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        self.entries.shift_remove_index(index);
        true
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &str)> {
        self.entries.iter().map(|(key, text)| (key, text.as_str()))
    }
}

impl From<Vec<KeyBinding>> for KeyBindings {
    fn from(entries: Vec<KeyBinding>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<KeyBindings> for Vec<KeyBinding> {
    fn from(bindings: KeyBindings) -> Self {
        bindings
            .entries
            .into_iter()
            .map(|(key, text)| KeyBinding { key, text })
            .collect()
    }
}
