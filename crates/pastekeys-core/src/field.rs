// PasteKeys Field Resolution
// Decides whether the focused element is a valid interception target

use std::str::FromStr;

use strum_macros::{Display, EnumString};

use crate::host::{NodeId, Page};
use crate::settings::Settings;

/// Form-control input type, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InputType {
    Text,
    Search,
    Url,
    Tel,
    Email,
    Number,
    Password,
    Other,
}

impl InputType {
    /// Parse the host's type attribute; anything unrecognized is `Other`.
    pub fn from_attribute(attribute: &str) -> Self {
        Self::from_str(attribute).unwrap_or(InputType::Other)
    }

    /// Whether the type supports selection-based insertion. Password fields
    /// join the set only when the user opted in.
    fn selection_capable(self, allow_password: bool) -> bool {
        match self {
            InputType::Text
            | InputType::Search
            | InputType::Url
            | InputType::Tel
            | InputType::Email
            | InputType::Number => true,
            InputType::Password => allow_password,
            InputType::Other => false,
        }
    }

    /// Types whose selection API misreports ranges during mutation; the
    /// injector appends to the whole value for these instead.
    pub fn append_workaround(self) -> bool {
        matches!(self, InputType::Email | InputType::Number)
    }
}

/// Raw classification of a focused element, as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub control: FieldControl,
    pub read_only: bool,
    pub content_editable: bool,
}

/// What kind of element holds the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldControl {
    Input(InputType),
    TextArea,
    Other,
}

impl FieldInfo {
    pub fn input(input_type: InputType) -> Self {
        Self {
            control: FieldControl::Input(input_type),
            read_only: false,
            content_editable: false,
        }
    }

    pub fn textarea() -> Self {
        Self {
            control: FieldControl::TextArea,
            read_only: false,
            content_editable: false,
        }
    }

    pub fn editable() -> Self {
        Self {
            control: FieldControl::Other,
            read_only: false,
            content_editable: true,
        }
    }

    pub fn other() -> Self {
        Self {
            control: FieldControl::Other,
            read_only: false,
            content_editable: false,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// An element the engine has accepted as an interception target, tagged
/// with the mutation model the injector must use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Input(InputType),
    TextArea,
    ContentEditable,
}

/// Classify a focused element against the eligibility rules.
///
/// Inputs qualify when writable and of a selection-capable type, textareas
/// when writable, anything else only when content-editable.
pub fn resolve(info: &FieldInfo, settings: &Settings) -> Option<FieldKind> {
    match info.control {
        FieldControl::Input(input_type) => {
            if info.read_only {
                return None;
            }
            input_type
                .selection_capable(settings.insert_into_password_field)
                .then_some(FieldKind::Input(input_type))
        }
        FieldControl::TextArea => (!info.read_only).then_some(FieldKind::TextArea),
        FieldControl::Other => info.content_editable.then_some(FieldKind::ContentEditable),
    }
}

/// Resolve the page's currently focused element, if it is interceptable.
pub fn resolve_focused(page: &dyn Page, settings: &Settings) -> Option<(NodeId, FieldKind)> {
    let (node, info) = page.focused_element()?;
    resolve(&info, settings).map(|kind| (node, kind))
}
