// PasteKeys Session
// Event-driven state machine arbitrating insert and paste modes

use std::sync::Arc;

use crate::bindings::KeyBindings;
use crate::field::{self, FieldKind};
use crate::host::{Clipboard, NodeId, Page};
use crate::inject;
use crate::key::Key;
use crate::pressed::PressedKeys;
use crate::settings::Settings;
use crate::storage::SnapshotUpdate;

/// Direction of a normalized key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Press,
    Release,
}

/// Which mode the session is in.
///
/// Insert and paste are mutually exclusive: a combination keydown for one
/// is ignored entirely while the other is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    Insert,
    Paste,
}

/// The event hooks engaged on an intercepted field.
///
/// Insert mode engages all three; paste mode only suppresses native input
/// so the chord keys never appear in the field. The three are always
/// engaged and released together with the grip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHooks {
    /// Before-mutation suppressor: cancels native text-insertion side
    /// effects of the chord keys.
    pub suppress_input: bool,
    /// Binding lookup + insertion on keydown.
    pub keydown: bool,
    /// Chord tracking on keyup.
    pub keyup: bool,
}

impl FieldHooks {
    pub fn all() -> Self {
        Self {
            suppress_input: true,
            keydown: true,
            keyup: true,
        }
    }

    pub fn suppress_only() -> Self {
        Self {
            suppress_input: true,
            keydown: false,
            keyup: false,
        }
    }

    /// How many hooks are engaged.
    pub fn count(&self) -> usize {
        [self.suppress_input, self.keydown, self.keyup]
            .into_iter()
            .filter(|engaged| *engaged)
            .count()
    }
}

/// The field currently intercepted by the session.
///
/// Holds only a non-owning node id; the host keeps the node alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldGrip {
    pub node: NodeId,
    pub kind: FieldKind,
    pub hooks: FieldHooks,
}

/// Per-page engine state: current mode, held keys, intercepted field, and
/// the active configuration snapshot.
///
/// All transitions run synchronously inside `process_event`; the settings
/// and bindings references are swapped wholesale by `apply_update` and
/// never mutated in place.
#[derive(Debug)]
pub struct Session {
    mode: Mode,
    pressed: PressedKeys,
    grip: Option<FieldGrip>,
    settings: Arc<Settings>,
    bindings: Arc<KeyBindings>,
}

impl Session {
    /// Create an idle session with default settings and no bindings.
    pub fn new() -> Self {
        Self::with_config(Settings::default(), KeyBindings::new())
    }

    /// Create an idle session with an initial configuration snapshot.
    pub fn with_config(settings: Settings, bindings: KeyBindings) -> Self {
        Self {
            mode: Mode::Idle,
            pressed: PressedKeys::new(),
            grip: None,
            settings: Arc::new(settings),
            bindings: Arc::new(bindings),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The intercepted field, if any.
    pub fn grip(&self) -> Option<&FieldGrip> {
        self.grip.as_ref()
    }

    /// The keys currently tracked as held.
    pub fn pressed(&self) -> &PressedKeys {
        &self.pressed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Replace configuration wholesale. Each half of the update applies
    /// independently; an empty update is a no-op.
    pub fn apply_update(&mut self, update: SnapshotUpdate) {
        if let Some(settings) = update.settings {
            log::debug!("settings snapshot replaced");
            self.settings = Arc::new(settings);
        }
        if let Some(bindings) = update.bindings {
            log::debug!("binding table replaced ({} bindings)", bindings.len());
            self.bindings = Arc::new(bindings);
        }
    }

    /// Feed one normalized key event through the state machine.
    pub fn process_event(
        &mut self,
        page: &mut dyn Page,
        clipboard: &mut dyn Clipboard,
        key: &Key,
        action: Action,
    ) {
        match action {
            Action::Press => self.on_key_down(page, clipboard, key),
            Action::Release => self.on_key_up(key),
        }
    }

    fn is_insert_combination(&self, key: &Key) -> bool {
        self.settings.insert_combination_key.as_ref() == Some(key)
    }

    fn is_paste_combination(&self, key: &Key) -> bool {
        self.settings.paste_combination_key.as_ref() == Some(key)
    }

    fn on_key_down(&mut self, page: &mut dyn Page, clipboard: &mut dyn Clipboard, key: &Key) {
        if self.is_insert_combination(key) && self.mode != Mode::Paste {
            if self.mode == Mode::Idle {
                log::debug!("insert mode armed by {}", key.display());
                self.mode = Mode::Insert;
            }
            // Auto-repeat of the held combination key lands here too and
            // re-resolves focus, which is how a mid-chord focus change is
            // picked up.
            self.regrip(page, FieldHooks::all());
        } else if self.is_paste_combination(key) && self.mode != Mode::Insert {
            if self.mode == Mode::Idle {
                log::debug!("paste mode armed by {}", key.display());
                self.mode = Mode::Paste;
            }
            self.regrip(page, FieldHooks::suppress_only());
        } else {
            match self.mode {
                Mode::Insert => self.on_chord_key(page, clipboard, key, Mode::Insert),
                Mode::Paste => self.on_chord_key(page, clipboard, key, Mode::Paste),
                Mode::Idle => {}
            }
        }
    }

    /// A non-combination keydown while a mode is active: track it, and fire
    /// the binding lookup only when it is the first key of the chord.
    fn on_chord_key(
        &mut self,
        page: &mut dyn Page,
        clipboard: &mut dyn Clipboard,
        key: &Key,
        mode: Mode,
    ) {
        let newly_added = self.pressed.push_if_absent(key.clone());
        if !newly_added || self.pressed.len() != 1 || self.bindings.is_empty() {
            return;
        }
        let Some(text) = self.bindings.get_text(key) else {
            return;
        };
        match mode {
            Mode::Insert => {
                if let Some(grip) = self.grip {
                    inject::insert_text(page, grip.node, grip.kind, text);
                }
            }
            Mode::Paste => {
                if let Err(err) = clipboard.write_text(text) {
                    log::debug!("{}", err);
                }
            }
            Mode::Idle => {}
        }
    }

    fn on_key_up(&mut self, key: &Key) {
        match self.mode {
            Mode::Insert if self.is_insert_combination(key) => self.exit_mode(),
            Mode::Paste if self.is_paste_combination(key) => self.exit_mode(),
            Mode::Insert | Mode::Paste => {
                self.pressed.remove(key);
            }
            Mode::Idle => {}
        }
    }

    /// Re-resolve the focused field and move the grip if it changed.
    fn regrip(&mut self, page: &dyn Page, hooks: FieldHooks) {
        match field::resolve_focused(page, &self.settings) {
            Some((node, kind)) => {
                let same = self.grip.is_some_and(|grip| grip.node == node);
                if !same {
                    if self.grip.is_some() {
                        log::debug!("interception moved to a newly focused field");
                    }
                    self.grip = Some(FieldGrip { node, kind, hooks });
                }
            }
            None => {
                // Mode stays armed; keys keep being tracked, but there is
                // no insertion/suppression target.
                if self.grip.take().is_some() {
                    log::debug!("focused element is not interceptable; field released");
                }
            }
        }
    }

    fn exit_mode(&mut self) {
        log::debug!("{:?} mode released", self.mode);
        self.mode = Mode::Idle;
        self.grip = None;
        self.pressed.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::KeyBinding;
    use crate::field::FieldInfo;
    use crate::host::{ClipboardError, SelectionState};
    use crate::key::key_from_name;

    fn key(name: &str) -> Key {
        key_from_name(name).unwrap()
    }

    fn settings(insert: Option<&str>, paste: Option<&str>) -> Settings {
        Settings {
            insert_combination_key: insert.map(key),
            paste_combination_key: paste.map(key),
            ..Settings::default()
        }
    }

    /// One-field page: a textarea whose selection collapses after every
    /// range replacement.
    struct OneFieldPage {
        focused: bool,
        info: FieldInfo,
        value: String,
        cursor: Option<(usize, usize)>,
    }

    impl OneFieldPage {
        fn textarea() -> Self {
            Self {
                focused: true,
                info: FieldInfo::textarea(),
                value: String::new(),
                cursor: None,
            }
        }
    }

    impl Page for OneFieldPage {
        fn focused_element(&self) -> Option<(NodeId, FieldInfo)> {
            self.focused.then_some((NodeId(1), self.info))
        }

        fn value(&self, _node: NodeId) -> String {
            self.value.clone()
        }

        fn set_value(&mut self, _node: NodeId, value: &str) {
            self.value = value.to_string();
        }

        fn selection_range(&self, _node: NodeId) -> Option<(usize, usize)> {
            self.cursor
        }

        fn replace_range(&mut self, _node: NodeId, start: usize, end: usize, text: &str) {
            let chars: Vec<char> = self.value.chars().collect();
            let start = start.min(chars.len());
            let end = end.min(chars.len());
            let mut next: String = chars[..start].iter().collect();
            next.push_str(text);
            next.extend(&chars[end..]);
            self.value = next;
            let after = start + text.chars().count();
            self.cursor = Some((after, after));
        }

        fn selection(&self) -> SelectionState {
            SelectionState::None
        }

        fn text(&self, _node: NodeId) -> String {
            self.value.clone()
        }

        fn set_text(&mut self, _node: NodeId, text: &str) {
            self.value = text.to_string();
        }

        fn collapse_selection(&mut self, _node: NodeId, offset: usize) {
            self.cursor = Some((offset, offset));
        }
    }

    #[derive(Default)]
    struct RecordingClipboard {
        written: Vec<String>,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.written.push(text.to_string());
            Ok(())
        }
    }

    fn press(session: &mut Session, page: &mut OneFieldPage, clip: &mut RecordingClipboard, k: &str) {
        session.process_event(page, clip, &key(k), Action::Press);
    }

    fn release(
        session: &mut Session,
        page: &mut OneFieldPage,
        clip: &mut RecordingClipboard,
        k: &str,
    ) {
        session.process_event(page, clip, &key(k), Action::Release);
    }

    #[test]
    fn test_idle_by_default() {
        let session = Session::new();
        assert_eq!(session.mode(), Mode::Idle);
        assert!(session.grip().is_none());
        assert!(session.pressed().is_empty());
    }

    #[test]
    fn test_insert_combination_arms_and_grips() {
        let mut session = Session::with_config(settings(Some("F9"), None), KeyBindings::new());
        let mut page = OneFieldPage::textarea();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F9");
        assert_eq!(session.mode(), Mode::Insert);
        let grip = session.grip().unwrap();
        assert_eq!(grip.node, NodeId(1));
        assert_eq!(grip.hooks, FieldHooks::all());
        assert_eq!(grip.hooks.count(), 3);
    }

    #[test]
    fn test_paste_combination_grips_suppressor_only() {
        let mut session = Session::with_config(settings(None, Some("F4")), KeyBindings::new());
        let mut page = OneFieldPage::textarea();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F4");
        assert_eq!(session.mode(), Mode::Paste);
        let grip = session.grip().unwrap();
        assert_eq!(grip.hooks, FieldHooks::suppress_only());
        assert_eq!(grip.hooks.count(), 1);
    }

    #[test]
    fn test_modes_are_mutually_exclusive() {
        let mut session =
            Session::with_config(settings(Some("F9"), Some("F4")), KeyBindings::new());
        let mut page = OneFieldPage::textarea();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F9");
        press(&mut session, &mut page, &mut clip, "F4");
        assert_eq!(session.mode(), Mode::Insert);

        release(&mut session, &mut page, &mut clip, "F9");
        assert_eq!(session.mode(), Mode::Idle);

        press(&mut session, &mut page, &mut clip, "F4");
        press(&mut session, &mut page, &mut clip, "F9");
        assert_eq!(session.mode(), Mode::Paste);
    }

    #[test]
    fn test_release_resets_session() {
        let bindings = KeyBindings::from_entries([KeyBinding::new(key("F2"), "hello")]);
        let mut session = Session::with_config(settings(Some("F9"), None), bindings);
        let mut page = OneFieldPage::textarea();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F9");
        press(&mut session, &mut page, &mut clip, "F2");
        release(&mut session, &mut page, &mut clip, "F9");

        assert_eq!(session.mode(), Mode::Idle);
        assert!(session.grip().is_none());
        assert!(session.pressed().is_empty());
    }

    #[test]
    fn test_first_chord_key_inserts() {
        let bindings = KeyBindings::from_entries([KeyBinding::new(key("F2"), "hello")]);
        let mut session = Session::with_config(settings(Some("F9"), None), bindings);
        let mut page = OneFieldPage::textarea();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F9");
        press(&mut session, &mut page, &mut clip, "F2");
        assert_eq!(page.value, "hello");
        assert_eq!(page.cursor, Some((5, 5)));
    }

    #[test]
    fn test_second_held_key_suppressed() {
        let bindings = KeyBindings::from_entries([
            KeyBinding::new(key("F2"), "hello"),
            KeyBinding::new(key("a"), "also bound"),
        ]);
        let mut session = Session::with_config(settings(Some("F9"), None), bindings);
        let mut page = OneFieldPage::textarea();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F9");
        press(&mut session, &mut page, &mut clip, "F2");
        press(&mut session, &mut page, &mut clip, "a");
        assert_eq!(page.value, "hello");
        assert_eq!(session.pressed().len(), 2);
    }

    #[test]
    fn test_auto_repeat_inserts_once() {
        let bindings = KeyBindings::from_entries([KeyBinding::new(key("F2"), "hello")]);
        let mut session = Session::with_config(settings(Some("F9"), None), bindings);
        let mut page = OneFieldPage::textarea();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F9");
        press(&mut session, &mut page, &mut clip, "F2");
        press(&mut session, &mut page, &mut clip, "F2");
        press(&mut session, &mut page, &mut clip, "F2");
        assert_eq!(page.value, "hello");
    }

    #[test]
    fn test_chord_key_released_can_fire_again() {
        let bindings = KeyBindings::from_entries([KeyBinding::new(key("F2"), "hi")]);
        let mut session = Session::with_config(settings(Some("F9"), None), bindings);
        let mut page = OneFieldPage::textarea();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F9");
        press(&mut session, &mut page, &mut clip, "F2");
        release(&mut session, &mut page, &mut clip, "F2");
        press(&mut session, &mut page, &mut clip, "F2");
        assert_eq!(page.value, "hihi");
    }

    #[test]
    fn test_paste_mode_stages_clipboard() {
        let bindings = KeyBindings::from_entries([KeyBinding::new(key("F8"), "token")]);
        let mut session = Session::with_config(settings(None, Some("F4")), bindings);
        let mut page = OneFieldPage::textarea();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F4");
        press(&mut session, &mut page, &mut clip, "F8");
        assert_eq!(clip.written, vec!["token"]);
        assert_eq!(page.value, "");
    }

    #[test]
    fn test_unbound_key_does_nothing() {
        let bindings = KeyBindings::from_entries([KeyBinding::new(key("F2"), "hello")]);
        let mut session = Session::with_config(settings(Some("F9"), None), bindings);
        let mut page = OneFieldPage::textarea();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F9");
        press(&mut session, &mut page, &mut clip, "a");
        assert_eq!(page.value, "");
        assert_eq!(session.pressed().len(), 1);
    }

    #[test]
    fn test_disabled_combination_keys_never_arm() {
        let mut session = Session::with_config(settings(None, None), KeyBindings::new());
        let mut page = OneFieldPage::textarea();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F9");
        press(&mut session, &mut page, &mut clip, "F4");
        assert_eq!(session.mode(), Mode::Idle);
        assert!(session.pressed().is_empty());
    }

    #[test]
    fn test_no_focus_keeps_mode_without_grip() {
        let bindings = KeyBindings::from_entries([KeyBinding::new(key("F2"), "hello")]);
        let mut session = Session::with_config(settings(Some("F9"), None), bindings);
        let mut page = OneFieldPage::textarea();
        page.focused = false;
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F9");
        assert_eq!(session.mode(), Mode::Insert);
        assert!(session.grip().is_none());

        // Keys are still tracked, but nothing is inserted anywhere.
        press(&mut session, &mut page, &mut clip, "F2");
        assert_eq!(session.pressed().len(), 1);
        assert_eq!(page.value, "");
    }

    #[test]
    fn test_read_only_field_not_gripped() {
        let mut session = Session::with_config(settings(Some("F9"), None), KeyBindings::new());
        let mut page = OneFieldPage::textarea();
        page.info = FieldInfo::textarea().read_only();
        let mut clip = RecordingClipboard::default();

        press(&mut session, &mut page, &mut clip, "F9");
        assert_eq!(session.mode(), Mode::Insert);
        assert!(session.grip().is_none());
    }

    #[test]
    fn test_apply_update_swaps_halves_independently() {
        let mut session = Session::new();
        assert!(session.bindings().is_empty());

        session.apply_update(SnapshotUpdate {
            settings: None,
            bindings: Some(KeyBindings::from_entries([KeyBinding::new(
                key("F2"),
                "hello",
            )])),
        });
        assert_eq!(session.bindings().len(), 1);
        assert!(session.settings().insert_combination_key.is_some());

        session.apply_update(SnapshotUpdate {
            settings: Some(settings(None, None)),
            bindings: None,
        });
        assert!(session.settings().insert_combination_key.is_none());
        assert_eq!(session.bindings().len(), 1);
    }

    #[test]
    fn test_clipboard_failure_is_swallowed() {
        struct FailingClipboard;
        impl Clipboard for FailingClipboard {
            fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
                Err(ClipboardError::WriteFailed("denied".to_string()))
            }
        }

        let bindings = KeyBindings::from_entries([KeyBinding::new(key("F8"), "token")]);
        let mut session = Session::with_config(settings(None, Some("F4")), bindings);
        let mut page = OneFieldPage::textarea();
        let mut clip = FailingClipboard;

        session.process_event(&mut page, &mut clip, &key("F4"), Action::Press);
        session.process_event(&mut page, &mut clip, &key("F8"), Action::Press);
        // Still in paste mode, still tracking; the failure is invisible.
        assert_eq!(session.mode(), Mode::Paste);
        assert_eq!(session.pressed().len(), 1);
    }
}
