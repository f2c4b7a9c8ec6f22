// PasteKeys Core Library
// Event-driven chord-to-snippet engine behind host capability traits

pub mod bindings;
pub mod field;
pub mod host;
pub mod inject;
pub mod key;
pub mod pressed;
pub mod session;
pub mod settings;
pub mod storage;

pub use bindings::{KeyBinding, KeyBindings};
pub use field::{FieldControl, FieldInfo, FieldKind, InputType};
pub use host::{Clipboard, ClipboardError, NodeId, Page, SelectionState};
pub use key::{key_from_name, Key, KeyLocation};
pub use pressed::PressedKeys;
pub use session::{Action, FieldGrip, FieldHooks, Mode, Session};
pub use settings::{allowed_combination_keys, is_reserved_key, ColorTheme, Settings};
pub use storage::{default_snapshot_content, SnapshotError, SnapshotFile, SnapshotUpdate};
