//! First-run setup
//!
//! Opened automatically while the platform reports no workspace. It cannot be
//! dismissed; the only ways out are initializing or quitting.

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
use super::text_input::TextField;
use super::{ModalOutcome, Submission};
use crate::tui::themes::Theme;

#[derive(Debug, Clone)]
pub struct SetupDialog {
    path: TextField,
    error: Option<String>,
}

impl SetupDialog {
    pub fn new(default_path: &str) -> Self {
        Self {
            path: TextField::with_value(default_path),
            error: None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> ModalOutcome {
        match code {
            KeyCode::Esc => {
                self.error = Some("A workspace is required. Ctrl+C quits.".to_string());
                ModalOutcome::Stay
            }
            KeyCode::Enter if self.path.is_blank() => {
                self.error = Some("Workspace path is required".to_string());
                ModalOutcome::Stay
            }
            KeyCode::Enter => ModalOutcome::Submit(Submission::Action(
                ActionRequest::new(ActionKind::Initialize, ActionTarget::Global)
                    .with_input(ActionInput::Text(self.path.value().trim().to_string())),
            )),
            _ => {
                if self.path.handle_key(code, modifiers) {
                    self.error = None;
                }
                ModalOutcome::Stay
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let area = ModalSize::Medium.area(area);
        render_modal_background(f, area, theme);
        let block = modal_block(theme).border_style(Style::default().fg(theme.accent_color));
        let inner = center_content(block.inner(area), 3);
        f.render_widget(block, area);

        let text = Style::default().fg(theme.text_color);
        let mut lines = modal_title("Welcome to Foreman", theme);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No fleet workspace was found. Foreman can create one now.",
            text,
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Workspace directory",
            Style::default()
                .fg(theme.accent_color)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(self.path.spans(true, theme)));
        lines.push(Line::from(""));
        if let Some(error) = &self.error {
            lines.push(error_line(error, theme));
        }
        lines.push(hint_line(&[("Enter", "initialize"), ("Ctrl+C", "quit")], theme));

        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_does_not_dismiss() {
        let mut setup = SetupDialog::new("/srv/fleet");
        assert_eq!(
            setup.handle_key(KeyCode::Esc, KeyModifiers::NONE),
            ModalOutcome::Stay
        );
    }

    #[test]
    fn test_submit_initializes_path() {
        let mut setup = SetupDialog::new("/srv/fleet");
        assert_eq!(
            setup.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            ModalOutcome::Submit(Submission::Action(
                ActionRequest::new(ActionKind::Initialize, ActionTarget::Global)
                    .with_input(ActionInput::Text("/srv/fleet".into()))
            ))
        );
    }

    #[test]
    fn test_blank_path_rejected() {
        let mut setup = SetupDialog::new("");
        assert_eq!(
            setup.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            ModalOutcome::Stay
        );
    }
}
