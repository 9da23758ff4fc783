//! Attach to a worker session, optionally on a remote host

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use foreman_core::snapshot::Worker;
use foreman_core::{ActionInput, ActionKind, ActionRequest, ActionTarget};

use super::common::{
    center_content, error_line, hint_line, modal_block, modal_title, render_modal_background,
    ModalSize,
};
use super::text_input::TextField;
use super::{ModalOutcome, Submission};
use crate::tui::themes::Theme;

#[derive(Debug, Clone)]
pub struct RemoteAttachDialog {
    target: ActionTarget,
    session: Option<String>,
    host: TextField,
    error: Option<String>,
}

impl RemoteAttachDialog {
    /// Prefilled with the host the worker last reported
    pub fn new(worker: &Worker) -> Self {
        Self {
            target: ActionTarget::Worker {
                project: worker.project.clone(),
                name: worker.name.clone(),
            },
            session: worker.session.clone(),
            host: TextField::with_value(worker.host.clone().unwrap_or_default()),
            error: None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> ModalOutcome {
        match code {
            KeyCode::Esc => ModalOutcome::Cancel,
            KeyCode::Enter => {
                let host = self.host.value().trim().to_string();
                if host.contains(char::is_whitespace) {
                    self.error = Some("Host may not contain spaces".to_string());
                    return ModalOutcome::Stay;
                }
                ModalOutcome::Submit(Submission::Action(
                    ActionRequest::new(ActionKind::AttachWorker, self.target.clone())
                        .with_input(ActionInput::Text(host)),
                ))
            }
            _ => {
                if self.host.handle_key(code, modifiers) {
                    self.error = None;
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

        let dim = Style::default().fg(theme.dim_color);
        let mut lines = modal_title(&format!("Attach to {}", self.target), theme);
        lines.push(Line::from(Span::styled(
            format!(
                "Session: {}",
                self.session.as_deref().unwrap_or("(none reported)")
            ),
            dim,
        )));
        lines.push(Line::from(""));
        let mut host = vec![Span::styled("Host  ", Style::default().fg(theme.accent_color))];
        host.extend(self.host.spans(true, theme));
        lines.push(Line::from(host));
        lines.push(Line::from(Span::styled("Leave empty for this machine", dim)));
        lines.push(Line::from(""));
        if let Some(error) = &self.error {
            lines.push(error_line(error, theme));
        }
        lines.push(hint_line(&[("Enter", "attach"), ("Esc", "cancel")], theme));

        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
