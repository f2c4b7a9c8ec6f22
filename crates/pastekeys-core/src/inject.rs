// PasteKeys Text Injection
// Selection-aware insertion into the three editable-element models

use crate::field::FieldKind;
use crate::host::{NodeId, Page, SelectionState};

/// Insert `text` into the resolved target, honoring the element's mutation
/// model. All offsets are in characters.
pub fn insert_text(page: &mut dyn Page, node: NodeId, kind: FieldKind, text: &str) {
    match kind {
        FieldKind::ContentEditable => insert_content_editable(page, node, text),
        FieldKind::Input(input_type) if input_type.append_workaround() => {
            // Selection offsets on these types are unreliable during
            // mutation, so append to the whole value. A number field can be
            // left holding an invalid value this way.
            let value = page.value(node);
            page.set_value(node, &format!("{}{}", value, text));
        }
        FieldKind::Input(_) | FieldKind::TextArea => {
            let end_of_value = page.value(node).chars().count();
            let (start, end) = page
                .selection_range(node)
                .unwrap_or((end_of_value, end_of_value));
            page.replace_range(node, start, end, text);
        }
    }
}

fn insert_content_editable(page: &mut dyn Page, node: NodeId, text: &str) {
    match page.selection() {
        SelectionState::TextNodes { anchor, focus } => {
            let begin = anchor.min(focus);
            let end = anchor.max(focus);
            let current = page.text(node);
            page.set_text(node, &splice_chars(&current, begin, end, text));
            page.collapse_selection(node, begin + text.chars().count());
        }
        SelectionState::NonText if page.text(node).is_empty() => {
            page.set_text(node, text);
            page.collapse_selection(node, text.chars().count());
        }
        // A selection spanning non-text nodes over existing content has no
        // meaningful single insertion point; leave the element alone.
        _ => {}
    }
}

/// Replace the characters in `[begin, end)` with `text`. Out-of-range
/// offsets clamp to the string's end.
fn splice_chars(s: &str, begin: usize, end: usize, text: &str) -> String {
    let byte_at = |offset: usize| {
        s.char_indices()
            .nth(offset)
            .map(|(byte, _)| byte)
            .unwrap_or(s.len())
    };
    let begin_byte = byte_at(begin.min(end));
    let end_byte = byte_at(begin.max(end));
    let mut out = String::with_capacity(s.len() + text.len());
    out.push_str(&s[..begin_byte]);
    out.push_str(text);
    out.push_str(&s[end_byte..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_chars_middle() {
        assert_eq!(splice_chars("ab", 1, 1, "X"), "aXb");
        assert_eq!(splice_chars("hello", 1, 4, "_"), "h_o");
    }

    #[test]
    fn test_splice_chars_empty() {
        assert_eq!(splice_chars("", 0, 0, "hi"), "hi");
    }

    #[test]
    fn test_splice_chars_clamps() {
        assert_eq!(splice_chars("ab", 5, 9, "X"), "abX");
    }

    #[test]
    fn test_splice_chars_multibyte() {
        assert_eq!(splice_chars("héllo", 2, 3, "X"), "héXlo");
    }
}
