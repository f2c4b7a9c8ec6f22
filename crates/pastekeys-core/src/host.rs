// PasteKeys Host Interface
// Capability traits the embedding environment implements

use crate::field::FieldInfo;

/// Opaque identity of a host document node.
///
/// The engine only compares these; it never controls node lifetime. A
/// stored id may go stale when the host drops the node, in which case the
/// host's accessors are expected to treat it as an empty target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Where the document's current text selection sits, as far as the
/// content-editable insertion path cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// No selection object at all.
    None,
    /// Both endpoints sit inside text nodes, with character offsets.
    TextNodes { anchor: usize, focus: usize },
    /// At least one endpoint is not a text node.
    NonText,
}

/// Error from a clipboard write.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Write access to the system clipboard.
///
/// Invoked only while staging text in paste mode. Callers treat the write
/// as best-effort: failures are logged and dropped, never retried.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Focus, selection, and mutation access to the host document.
///
/// Any environment that can answer these queries can back the field
/// resolver and the text injector; the engine never assumes more DOM than
/// this.
pub trait Page {
    /// Identity and classification of the currently focused element.
    fn focused_element(&self) -> Option<(NodeId, FieldInfo)>;

    // Form-control model (input / textarea)

    /// The control's current value.
    fn value(&self, node: NodeId) -> String;

    /// Replace the control's whole value. Used by the append workaround,
    /// which deliberately bypasses the selection API.
    fn set_value(&mut self, node: NodeId, value: &str);

    /// Current selection range in characters, start <= end. `None` when the
    /// control reports no selection.
    fn selection_range(&self, node: NodeId) -> Option<(usize, usize)>;

    /// Replace the characters in `[start, end)` with `text`, leaving the
    /// cursor collapsed immediately after the inserted text.
    fn replace_range(&mut self, node: NodeId, start: usize, end: usize, text: &str);

    // Content-editable model

    /// The document-level text selection.
    fn selection(&self) -> SelectionState;

    /// The element's rendered text.
    fn text(&self, node: NodeId) -> String;

    /// Replace the element's rendered text.
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Collapse the selection to the given character offset inside the
    /// node's text.
    fn collapse_selection(&mut self, node: NodeId, offset: usize);
}
