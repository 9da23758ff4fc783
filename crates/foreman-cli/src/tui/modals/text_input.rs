//! Text entry
//!
//! [`TextField`] is the single-line editor shared by every modal that takes
//! typed input. [`TextInputDialog`] wraps one or two fields with labels and
//! required-field validation.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use foreman_core::{ActionInput, ActionKind, ActionRequest, ActionTarget};

use super::common::{
    center_content, error_line, hint_line, modal_block, modal_title, render_modal_background,
    ModalSize,
};
use super::{ModalOutcome, Submission};
use crate::tui::themes::Theme;

/// Single-line editable text with a cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    /// Cursor position in chars
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Apply an editing key. Returns false when the key is not an edit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.clear();
                self.cursor = 0;
            }
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => return false,
            KeyCode::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.value.chars().count() {
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.chars().count(),
            _ => return false,
        }
        true
    }

    /// Spans for the field, with a block cursor when focused
    pub fn spans(&self, focused: bool, theme: &Theme) -> Vec<Span<'static>> {
        let text_style = Style::default().fg(theme.text_color);
        if !focused {
            return vec![Span::styled(self.value.clone(), text_style)];
        }
        let at = self.byte_index(self.cursor);
        let (before, rest) = self.value.split_at(at);
        let mut chars = rest.chars();
        let under = chars.next().map(String::from).unwrap_or_else(|| " ".into());
        let cursor_style = Style::default()
            .fg(theme.bg_color)
            .bg(theme.accent_color)
            .add_modifier(Modifier::BOLD);
        vec![
            Span::styled(before.to_string(), text_style),
            Span::styled(under, cursor_style),
            Span::styled(chars.as_str().to_string(), text_style),
        ]
    }
}

/// What the collected text is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    Nudge(ActionTarget),
    Mail(ActionTarget),
    AddProject,
}

#[derive(Debug, Clone)]
struct LabeledField {
    label: &'static str,
    field: TextField,
    required: bool,
}

/// One- or two-field text prompt
#[derive(Debug, Clone)]
pub struct TextInputDialog {
    title: String,
    purpose: InputPurpose,
    fields: Vec<LabeledField>,
    focus: usize,
    error: Option<String>,
}

impl TextInputDialog {
    pub fn nudge(target: ActionTarget) -> Self {
        Self {
            title: format!("Nudge {target}"),
            purpose: InputPurpose::Nudge(target),
            fields: vec![LabeledField {
                label: "Message",
                field: TextField::new(),
                required: true,
            }],
            focus: 0,
            error: None,
        }
    }

    pub fn mail(target: ActionTarget) -> Self {
        Self {
            title: format!("Mail {target}"),
            purpose: InputPurpose::Mail(target),
            fields: vec![
                LabeledField {
                    label: "Subject",
                    field: TextField::new(),
                    required: true,
                },
                LabeledField {
                    label: "Body",
                    field: TextField::new(),
                    required: false,
                },
            ],
            focus: 0,
            error: None,
        }
    }

    pub fn add_project() -> Self {
        Self {
            title: "Add Project".to_string(),
            purpose: InputPurpose::AddProject,
            fields: vec![
                LabeledField {
                    label: "Name",
                    field: TextField::new(),
                    required: true,
                },
                LabeledField {
                    label: "Repository",
                    field: TextField::new(),
                    required: true,
                },
            ],
            focus: 0,
            error: None,
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn value(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|f| f.field.value().trim().to_string())
            .unwrap_or_default()
    }

    fn validate(&self) -> Result<ActionRequest, String> {
        if let Some(missing) = self
            .fields
            .iter()
            .find(|f| f.required && f.field.is_blank())
        {
            return Err(format!("{} is required", missing.label));
        }

        let request = match &self.purpose {
            InputPurpose::Nudge(target) => ActionRequest::new(ActionKind::NudgeWorker, target.clone())
                .with_input(ActionInput::Text(self.value(0))),
            InputPurpose::Mail(target) => ActionRequest::new(ActionKind::SendMail, target.clone())
                .with_input(ActionInput::Pair(self.value(0), self.value(1))),
            InputPurpose::AddProject => {
                let name = self.value(0);
                if name.contains(char::is_whitespace) || name.contains('/') {
                    return Err("Name may not contain spaces or '/'".to_string());
                }
                ActionRequest::new(ActionKind::AddProject, ActionTarget::Project(name.clone()))
                    .with_input(ActionInput::Pair(name, self.value(1)))
            }
        };
        Ok(request)
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> ModalOutcome {
        match code {
            KeyCode::Esc => ModalOutcome::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields.len();
                ModalOutcome::Stay
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
                ModalOutcome::Stay
            }
            KeyCode::Enter if self.focus + 1 < self.fields.len() => {
                self.focus += 1;
                ModalOutcome::Stay
            }
            KeyCode::Enter => match self.validate() {
                Ok(request) => ModalOutcome::Submit(Submission::Action(request)),
                Err(message) => {
                    self.error = Some(message);
                    ModalOutcome::Stay
                }
            },
            _ => {
                if let Some(current) = self.fields.get_mut(self.focus) {
                    if current.field.handle_key(code, modifiers) {
                        self.error = None;
                    }
                }
                ModalOutcome::Stay
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let area = ModalSize::Small.area(area);
        render_modal_background(f, area, theme);
        let block = modal_block(theme);
        let inner = center_content(block.inner(area), 2);
        f.render_widget(block, area);

        let mut lines = modal_title(&self.title, theme);
        lines.push(Line::from(""));
        for (i, entry) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let label_style = if focused {
                Style::default().fg(theme.accent_color)
            } else {
                Style::default().fg(theme.dim_color)
            };
            let marker = if entry.required { "*" } else { " " };
            let mut spans = vec![Span::styled(
                format!("{:<11}{} ", entry.label, marker),
                label_style,
            )];
            spans.extend(entry.field.spans(focused, theme));
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
        if let Some(error) = &self.error {
            lines.push(error_line(error, theme));
        }
        lines.push(hint_line(
            &[("Tab", "next field"), ("Enter", "submit"), ("Esc", "cancel")],
            theme,
        ));

        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(dialog: &mut TextInputDialog, text: &str) {
        for c in text.chars() {
            dialog.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_text_field_editing() {
        let mut field = TextField::with_value("helo");
        field.handle_key(KeyCode::Left, KeyModifiers::NONE);
        field.handle_key(KeyCode::Char('l'), KeyModifiers::NONE);
        assert_eq!(field.value(), "hello");

        field.handle_key(KeyCode::Home, KeyModifiers::NONE);
        field.handle_key(KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(field.value(), "ello");

        field.handle_key(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert!(field.is_blank());
    }

    #[test]
    fn test_text_field_multibyte() {
        let mut field = TextField::new();
        for c in "héllo".chars() {
            field.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        field.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        field.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        field.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(field.value(), "hé");
    }

    #[test]
    fn test_required_field_blocks_submit() {
        let target = ActionTarget::Worker {
            project: "api".into(),
            name: "w1".into(),
        };
        let mut dialog = TextInputDialog::nudge(target.clone());
        assert_eq!(
            dialog.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            ModalOutcome::Stay
        );
        assert_eq!(dialog.error(), Some("Message is required"));

        type_text(&mut dialog, "status?");
        assert!(dialog.error().is_none());
        assert_eq!(
            dialog.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            ModalOutcome::Submit(Submission::Action(
                ActionRequest::new(ActionKind::NudgeWorker, target)
                    .with_input(ActionInput::Text("status?".into()))
            ))
        );
    }

    #[test]
    fn test_two_field_dialog_moves_focus_before_submit() {
        let mut dialog = TextInputDialog::add_project();
        type_text(&mut dialog, "api");
        assert_eq!(
            dialog.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            ModalOutcome::Stay
        );
        type_text(&mut dialog, "git@example.com:org/api.git");
        match dialog.handle_key(KeyCode::Enter, KeyModifiers::NONE) {
            ModalOutcome::Submit(Submission::Action(request)) => {
                assert_eq!(request.kind, ActionKind::AddProject);
                assert_eq!(
                    request.input,
                    Some(ActionInput::Pair(
                        "api".into(),
                        "git@example.com:org/api.git".into()
                    ))
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_project_name_is_validated() {
        let mut dialog = TextInputDialog::add_project();
        type_text(&mut dialog, "my api");
        dialog.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        type_text(&mut dialog, "https://example.com/api.git");
        assert_eq!(
            dialog.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            ModalOutcome::Stay
        );
        assert!(dialog.error().unwrap().contains("spaces"));
    }

    #[test]
    fn test_escape_cancels() {
        let mut dialog = TextInputDialog::add_project();
        assert_eq!(
            dialog.handle_key(KeyCode::Esc, KeyModifiers::NONE),
            ModalOutcome::Cancel
        );
    }
}
