// PasteKeys Simulation Harness
// In-memory page + clipboard and a line-oriented event script runner

use anyhow::{bail, Context, Result};

use pastekeys_core::{
    key_from_name, Action, Clipboard, ClipboardError, FieldInfo, InputType, NodeId, Page,
    SelectionState, Session,
};

struct SimField {
    name: String,
    info: FieldInfo,
    content: String,
    selection: Option<(usize, usize)>,
}

/// In-memory stand-in for the host document.
pub struct SimPage {
    fields: Vec<SimField>,
    focused: Option<usize>,
    doc_selection: SelectionState,
}

impl SimPage {
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            focused: None,
            doc_selection: SelectionState::None,
        }
    }

    fn add_field(&mut self, name: &str, info: FieldInfo) -> Result<()> {
        if self.index_of(name).is_some() {
            bail!("field '{}' already declared", name);
        }
        self.fields.push(SimField {
            name: name.to_string(),
            info,
            content: String::new(),
            selection: None,
        });
        Ok(())
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    fn get(&self, name: &str) -> Result<&SimField> {
        self.index_of(name)
            .map(|index| &self.fields[index])
            .with_context(|| format!("unknown field '{}'", name))
    }

    fn focused_mut(&mut self) -> Result<&mut SimField> {
        let index = self.focused.context("no field has focus")?;
        Ok(&mut self.fields[index])
    }
}

impl Page for SimPage {
    fn focused_element(&self) -> Option<(NodeId, FieldInfo)> {
        self.focused
            .map(|index| (NodeId(index as u64 + 1), self.fields[index].info))
    }

    fn value(&self, node: NodeId) -> String {
        self.fields[node.0 as usize - 1].content.clone()
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        self.fields[node.0 as usize - 1].content = value.to_string();
    }

    fn selection_range(&self, node: NodeId) -> Option<(usize, usize)> {
        self.fields[node.0 as usize - 1].selection
    }

    fn replace_range(&mut self, node: NodeId, start: usize, end: usize, text: &str) {
        let field = &mut self.fields[node.0 as usize - 1];
        let chars: Vec<char> = field.content.chars().collect();
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        let mut next: String = chars[..start].iter().collect();
        next.push_str(text);
        next.extend(&chars[end..]);
        field.content = next;
        let after = start + text.chars().count();
        field.selection = Some((after, after));
    }

    fn selection(&self) -> SelectionState {
        self.doc_selection
    }

    fn text(&self, node: NodeId) -> String {
        self.fields[node.0 as usize - 1].content.clone()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.fields[node.0 as usize - 1].content = text.to_string();
    }

    fn collapse_selection(&mut self, _node: NodeId, offset: usize) {
        self.doc_selection = SelectionState::TextNodes {
            anchor: offset,
            focus: offset,
        };
    }
}

/// Clipboard that just remembers what was staged.
#[derive(Default)]
pub struct SimClipboard {
    last: Option<String>,
}

impl Clipboard for SimClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        log::debug!("clipboard staged {} char(s)", text.chars().count());
        self.last = Some(text.to_string());
        Ok(())
    }
}

/// Replays a line-oriented event script against the engine.
///
/// Directives: `field <name> <kind>`, `focus <name>`, `blur`,
/// `down <key>` / `up <key>`, `select <start> <end>`, `set <name> <text>`,
/// `expect <name> <text>`, `expect-clipboard <text>`, `show`. Blank lines
/// and `#` comments are skipped.
pub struct Simulator {
    session: Session,
    page: SimPage,
    clipboard: SimClipboard,
}

impl Simulator {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            page: SimPage::new(),
            clipboard: SimClipboard::default(),
        }
    }

    pub fn run_script(&mut self, script: &str) -> Result<()> {
        for (number, raw) in script.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            self.run_directive(line)
                .with_context(|| format!("script line {}: {}", number + 1, line))?;
        }
        Ok(())
    }

    fn run_directive(&mut self, line: &str) -> Result<()> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "field" => {
                let (name, kind) = rest
                    .split_once(char::is_whitespace)
                    .context("usage: field <name> <kind> [readonly]")?;
                let (kind, modifier) = match kind.trim().split_once(char::is_whitespace) {
                    Some((kind, modifier)) => (kind, Some(modifier.trim())),
                    None => (kind.trim(), None),
                };
                let mut info = parse_field_kind(kind)?;
                match modifier {
                    None => {}
                    Some("readonly") => info = info.read_only(),
                    Some(other) => bail!("unknown field modifier '{}'", other),
                }
                self.page.add_field(name, info)
            }
            "focus" => {
                let index = self
                    .page
                    .index_of(rest)
                    .with_context(|| format!("unknown field '{}'", rest))?;
                self.page.focused = Some(index);
                Ok(())
            }
            "blur" => {
                self.page.focused = None;
                Ok(())
            }
            "down" | "up" => {
                let key = key_from_name(rest).with_context(|| format!("unknown key '{}'", rest))?;
                let action = if command == "down" {
                    Action::Press
                } else {
                    Action::Release
                };
                self.session
                    .process_event(&mut self.page, &mut self.clipboard, &key, action);
                Ok(())
            }
            "select" => {
                let (start, end) = rest
                    .split_once(char::is_whitespace)
                    .context("usage: select <start> <end>")?;
                let start: usize = start.trim().parse().context("bad start offset")?;
                let end: usize = end.trim().parse().context("bad end offset")?;
                let editable = self.page.focused_mut()?.info.content_editable;
                if editable {
                    self.page.doc_selection = SelectionState::TextNodes {
                        anchor: start,
                        focus: end,
                    };
                } else {
                    self.page.focused_mut()?.selection = Some((start.min(end), start.max(end)));
                }
                Ok(())
            }
            "set" => {
                let (name, text) = rest
                    .split_once(char::is_whitespace)
                    .context("usage: set <name> <text>")?;
                let index = self
                    .page
                    .index_of(name)
                    .with_context(|| format!("unknown field '{}'", name))?;
                self.page.fields[index].content = text.trim().to_string();
                Ok(())
            }
            "expect" => {
                let (name, expected) = rest
                    .split_once(char::is_whitespace)
                    .map(|(name, text)| (name, text.trim()))
                    .unwrap_or((rest, ""));
                let actual = &self.page.get(name)?.content;
                if actual != expected {
                    bail!("field '{}' holds {:?}, expected {:?}", name, actual, expected);
                }
                Ok(())
            }
            "expect-clipboard" => {
                let actual = self.clipboard.last.as_deref().unwrap_or("");
                if actual != rest {
                    bail!("clipboard holds {:?}, expected {:?}", actual, rest);
                }
                Ok(())
            }
            "show" => {
                self.show();
                Ok(())
            }
            other => bail!("unknown directive '{}'", other),
        }
    }

    fn show(&self) {
        println!("mode: {:?}", self.session.mode());
        for (index, field) in self.page.fields.iter().enumerate() {
            let marker = if self.page.focused == Some(index) {
                "*"
            } else {
                " "
            };
            println!("{} {}: {:?}", marker, field.name, field.content);
        }
        match &self.clipboard.last {
            Some(text) => println!("clipboard: {:?}", text),
            None => println!("clipboard: (empty)"),
        }
    }
}

fn parse_field_kind(kind: &str) -> Result<FieldInfo> {
    if let Some(input_type) = kind.strip_prefix("input:") {
        return Ok(FieldInfo::input(InputType::from_attribute(input_type)));
    }
    match kind {
        "input" => Ok(FieldInfo::input(InputType::Text)),
        "textarea" => Ok(FieldInfo::textarea()),
        "editable" => Ok(FieldInfo::editable()),
        other => bail!("unknown field kind '{}'", other),
    }
}
