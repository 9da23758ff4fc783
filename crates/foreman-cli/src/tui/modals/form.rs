//! Settings forms
//!
//! Edits either one project's settings or the global settings record. Only
//! changed fields are submitted. Global edits are routed through a
//! confirmation by the dispatcher.

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use foreman_core::constants::platform::BUILTIN_PRESETS;
use foreman_core::snapshot::{GlobalSettings, MergeStrategy, Project};
use foreman_core::{ActionInput, ActionKind, ActionRequest, ActionTarget};

use super::common::{
    center_content, error_line, hint_line, modal_block, modal_title, render_modal_background,
    ModalSize,
};
use super::text_input::TextField;
use super::{ModalOutcome, Submission};
use crate::tui::themes::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPurpose {
    Project(String),
    Global,
}

#[derive(Debug, Clone)]
enum FieldKind {
    Text(TextField),
    Number { field: TextField, min: u32, max: u32 },
    Toggle(bool),
    Choice { options: Vec<String>, index: usize },
}

#[derive(Debug, Clone)]
struct FormField {
    key: &'static str,
    label: &'static str,
    kind: FieldKind,
    original: String,
}

impl FormField {
    fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        let mut field = Self {
            key,
            label,
            kind,
            original: String::new(),
        };
        field.original = field.raw_value();
        field
    }

    fn raw_value(&self) -> String {
        match &self.kind {
            FieldKind::Text(field) | FieldKind::Number { field, .. } => {
                field.value().trim().to_string()
            }
            FieldKind::Toggle(on) => on.to_string(),
            FieldKind::Choice { options, index } => options.get(*index).cloned().unwrap_or_default(),
        }
    }

    fn validated(&self) -> Result<String, String> {
        let value = self.raw_value();
        match &self.kind {
            FieldKind::Number { min, max, .. } => match value.parse::<u32>() {
                Ok(n) if (*min..=*max).contains(&n) => Ok(n.to_string()),
                _ => Err(format!("{} must be between {min} and {max}", self.label)),
            },
            FieldKind::Text(_) if value.is_empty() => Err(format!("{} is required", self.label)),
            _ => Ok(value),
        }
    }

    /// Space, Left and Right cycle toggles and choices
    fn cycle(&mut self, forward: bool) -> bool {
        match &mut self.kind {
            FieldKind::Toggle(on) => {
                *on = !*on;
                true
            }
            FieldKind::Choice { options, index } if !options.is_empty() => {
                let len = options.len();
                *index = if forward { (*index + 1) % len } else { (*index + len - 1) % len };
                true
            }
            _ => false,
        }
    }

    fn edit(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match &mut self.kind {
            FieldKind::Text(field) => field.handle_key(code, modifiers),
            FieldKind::Number { field, .. } => match code {
                KeyCode::Char(c)
                    if !c.is_ascii_digit() && !modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    false
                }
                _ => field.handle_key(code, modifiers),
            },
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsForm {
    purpose: FormPurpose,
    fields: Vec<FormField>,
    focus: usize,
    error: Option<String>,
}

impl SettingsForm {
    pub fn project(project: &Project) -> Self {
        let settings = &project.settings;
        let strategies: Vec<String> = MergeStrategy::ALL
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        let strategy_index = MergeStrategy::ALL
            .iter()
            .position(|s| *s == settings.merge_strategy)
            .unwrap_or(0);
        Self::new(
            FormPurpose::Project(project.name.clone()),
            vec![
                FormField::new(
                    "repo_url",
                    "Repository",
                    FieldKind::Text(TextField::with_value(project.repo_url.clone())),
                ),
                FormField::new(
                    "max_workers",
                    "Max workers",
                    FieldKind::Number {
                        field: TextField::with_value(settings.max_workers.to_string()),
                        min: 1,
                        max: 32,
                    },
                ),
                FormField::new(
                    "merge_strategy",
                    "Merge strategy",
                    FieldKind::Choice {
                        options: strategies,
                        index: strategy_index,
                    },
                ),
                FormField::new("auto_merge", "Auto merge", FieldKind::Toggle(settings.auto_merge)),
            ],
        )
    }

    pub fn global(settings: &GlobalSettings) -> Self {
        let mut presets: Vec<String> = BUILTIN_PRESETS.iter().map(|p| p.to_string()).collect();
        if !presets.contains(&settings.default_preset) {
            presets.insert(0, settings.default_preset.clone());
        }
        let preset_index = presets
            .iter()
            .position(|p| *p == settings.default_preset)
            .unwrap_or(0);
        Self::new(
            FormPurpose::Global,
            vec![
                FormField::new(
                    "default_preset",
                    "Default preset",
                    FieldKind::Choice {
                        options: presets,
                        index: preset_index,
                    },
                ),
                FormField::new(
                    "idle_timeout_mins",
                    "Idle timeout (min)",
                    FieldKind::Number {
                        field: TextField::with_value(settings.idle_timeout_mins.to_string()),
                        min: 0,
                        max: 1440,
                    },
                ),
                FormField::new(
                    "notifications",
                    "Notifications",
                    FieldKind::Toggle(settings.notifications),
                ),
            ],
        )
    }

    fn new(purpose: FormPurpose, fields: Vec<FormField>) -> Self {
        Self {
            purpose,
            fields,
            focus: 0,
            error: None,
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn title(&self) -> String {
        match &self.purpose {
            FormPurpose::Project(name) => format!("Settings: {name}"),
            FormPurpose::Global => "Global Settings".to_string(),
        }
    }

    fn submit(&self) -> Result<ActionRequest, String> {
        let mut changed = BTreeMap::new();
        for field in &self.fields {
            let value = field.validated()?;
            if value != field.original {
                changed.insert(field.key.to_string(), value);
            }
        }
        if changed.is_empty() {
            return Err("No changes to save".to_string());
        }

        let (kind, target) = match &self.purpose {
            FormPurpose::Project(name) => (
                ActionKind::UpdateProjectSettings,
                ActionTarget::Project(name.clone()),
            ),
            FormPurpose::Global => (ActionKind::UpdateGlobalSettings, ActionTarget::Global),
        };
        Ok(ActionRequest::new(kind, target).with_input(ActionInput::Fields(changed)))
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> ModalOutcome {
        let count = self.fields.len();
        match code {
            KeyCode::Esc => return ModalOutcome::Cancel,
            KeyCode::Enter => {
                return match self.submit() {
                    Ok(request) => ModalOutcome::Submit(Submission::Action(request)),
                    Err(message) => {
                        self.error = Some(message);
                        ModalOutcome::Stay
                    }
                };
            }
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % count,
            KeyCode::BackTab | KeyCode::Up => self.focus = (self.focus + count - 1) % count,
            _ => {
                let field = &mut self.fields[self.focus];
                let changed = match code {
                    KeyCode::Char(' ') | KeyCode::Right => {
                        field.cycle(true) || field.edit(code, modifiers)
                    }
                    KeyCode::Left => field.cycle(false) || field.edit(code, modifiers),
                    _ => field.edit(code, modifiers),
                };
                if changed {
                    self.error = None;
                }
            }
        }
        ModalOutcome::Stay
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let area = ModalSize::Medium.area(area);
        render_modal_background(f, area, theme);
        let block = modal_block(theme);
        let inner = center_content(block.inner(area), 2);
        f.render_widget(block, area);

        let mut lines = modal_title(&self.title(), theme);
        lines.push(Line::from(""));
        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let label_style = if focused {
                Style::default()
                    .fg(theme.accent_color)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.dim_color)
            };
            let mut spans = vec![Span::styled(format!("{:<20}", field.label), label_style)];
            match &field.kind {
                FieldKind::Text(text) | FieldKind::Number { field: text, .. } => {
                    spans.extend(text.spans(focused, theme));
                }
                FieldKind::Toggle(on) => spans.push(Span::styled(
                    if *on { "[x] on" } else { "[ ] off" },
                    Style::default().fg(theme.text_color),
                )),
                FieldKind::Choice { options, index } => spans.push(Span::styled(
                    format!("‹ {} ›", options.get(*index).map(String::as_str).unwrap_or("-")),
                    Style::default().fg(theme.text_color),
                )),
            }
            if field.raw_value() != field.original {
                spans.push(Span::styled(" •", Style::default().fg(theme.warning_color)));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
        if let Some(error) = &self.error {
            lines.push(error_line(error, theme));
        }
        lines.push(hint_line(
            &[("↑↓", "field"), ("Space/←→", "change"), ("Enter", "save"), ("Esc", "cancel")],
            theme,
        ));

        f.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project {
            name: "api".into(),
            repo_url: "git@example.com:org/api.git".into(),
            ..Project::default()
        }
    }

    #[test]
    fn test_only_changed_fields_are_submitted() {
        let mut form = SettingsForm::project(&project());
        // Focus merge strategy, cycle to rebase
        form.handle_key(KeyCode::Down, KeyModifiers::NONE);
        form.handle_key(KeyCode::Down, KeyModifiers::NONE);
        form.handle_key(KeyCode::Char(' '), KeyModifiers::NONE);

        match form.handle_key(KeyCode::Enter, KeyModifiers::NONE) {
            ModalOutcome::Submit(Submission::Action(request)) => {
                assert_eq!(request.kind, ActionKind::UpdateProjectSettings);
                let mut expected = BTreeMap::new();
                expected.insert("merge_strategy".to_string(), "rebase".to_string());
                assert_eq!(request.input, Some(ActionInput::Fields(expected)));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_unchanged_form_does_not_submit() {
        let mut form = SettingsForm::global(&GlobalSettings::default());
        assert_eq!(
            form.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            ModalOutcome::Stay
        );
        assert_eq!(form.error(), Some("No changes to save"));
    }

    #[test]
    fn test_number_range_is_enforced() {
        let mut form = SettingsForm::project(&project());
        form.handle_key(KeyCode::Down, KeyModifiers::NONE);
        form.handle_key(KeyCode::Char('u'), KeyModifiers::CONTROL);
        form.handle_key(KeyCode::Char('x'), KeyModifiers::NONE);
        for c in "99".chars() {
            form.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        assert_eq!(
            form.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            ModalOutcome::Stay
        );
        assert_eq!(form.error(), Some("Max workers must be between 1 and 32"));
    }

    #[test]
    fn test_global_edit_targets_global_settings() {
        let mut form = SettingsForm::global(&GlobalSettings::default());
        form.handle_key(KeyCode::Up, KeyModifiers::NONE);
        form.handle_key(KeyCode::Char(' '), KeyModifiers::NONE);
        match form.handle_key(KeyCode::Enter, KeyModifiers::NONE) {
            ModalOutcome::Submit(Submission::Action(request)) => {
                assert_eq!(request.kind, ActionKind::UpdateGlobalSettings);
                assert_eq!(request.target, ActionTarget::Global);
                assert!(request.kind.requires_confirmation());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
