//! Yes/no confirmation
//!
//! Destructive actions and global settings edits are only ever dispatched
//! from here: [`Confirmed`] can only be built by this dialog.

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use foreman_core::ActionRequest;

use super::common::{
    center_content, hint_line, modal_block, modal_title, render_modal_background, ModalSize,
};
use super::{ModalOutcome, Submission};
use crate::tui::themes::Theme;

/// An action the user explicitly approved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed(ActionRequest);

impl Confirmed {
    pub fn into_request(self) -> ActionRequest {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    request: ActionRequest,
    /// Highlighted button; destructive prompts start on "No"
    yes_selected: bool,
}

impl ConfirmDialog {
    pub fn new(request: ActionRequest) -> Self {
        Self {
            yes_selected: !request.kind.is_destructive(),
            request,
        }
    }

    fn accept(&self) -> ModalOutcome {
        ModalOutcome::Submit(Submission::Confirmed(Confirmed(self.request.clone())))
    }

    pub fn handle_key(&mut self, code: KeyCode) -> ModalOutcome {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.accept(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => ModalOutcome::Cancel,
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.yes_selected = !self.yes_selected;
                ModalOutcome::Stay
            }
            KeyCode::Enter if self.yes_selected => self.accept(),
            KeyCode::Enter => ModalOutcome::Cancel,
            _ => ModalOutcome::Stay,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let area = ModalSize::Small.area(area);
        render_modal_background(f, area, theme);
        let destructive = self.request.kind.is_destructive();
        let mut block = modal_block(theme);
        if destructive {
            block = block.border_style(Style::default().fg(theme.error_color));
        }
        let inner = center_content(block.inner(area), 2);
        f.render_widget(block, area);

        let title = if destructive { "Are you sure?" } else { "Confirm" };
        let mut lines = modal_title(title, theme);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{}?", self.request.describe()),
            Style::default()
                .fg(theme.text_color)
                .add_modifier(Modifier::BOLD),
        )));
        if destructive {
            lines.push(Line::from(Span::styled(
                "This cannot be undone.",
                Style::default().fg(theme.warning_color),
            )));
        }
        lines.push(Line::from(""));

        let button = |label: &'static str, active: bool| {
            if active {
                Span::styled(
                    format!(" {label} "),
                    Style::default()
                        .fg(theme.bg_color)
                        .bg(theme.accent_color)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(format!(" {label} "), Style::default().fg(theme.dim_color))
            }
        };
        lines.push(Line::from(vec![
            button("Yes", self.yes_selected),
            Span::raw("   "),
            button("No", !self.yes_selected),
        ]));
        lines.push(Line::from(""));
        lines.push(hint_line(&[("y", "yes"), ("n/Esc", "no")], theme));

        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foreman_core::{ActionKind, ActionTarget};

    fn nuke() -> ActionRequest {
        ActionRequest::new(
            ActionKind::NukeWorker,
            ActionTarget::Worker {
                project: "api".into(),
                name: "w1".into(),
            },
        )
    }

    #[test]
    fn test_y_confirms() {
        let mut dialog = ConfirmDialog::new(nuke());
        match dialog.handle_key(KeyCode::Char('y')) {
            ModalOutcome::Submit(Submission::Confirmed(confirmed)) => {
                assert_eq!(confirmed.into_request(), nuke());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_enter_defaults_to_no_for_destructive() {
        let mut dialog = ConfirmDialog::new(nuke());
        assert_eq!(dialog.handle_key(KeyCode::Enter), ModalOutcome::Cancel);

        let mut dialog = ConfirmDialog::new(nuke());
        dialog.handle_key(KeyCode::Left);
        assert!(matches!(
            dialog.handle_key(KeyCode::Enter),
            ModalOutcome::Submit(Submission::Confirmed(_))
        ));
    }

    #[test]
    fn test_escape_and_n_cancel() {
        let mut dialog = ConfirmDialog::new(nuke());
        assert_eq!(dialog.handle_key(KeyCode::Esc), ModalOutcome::Cancel);
        assert_eq!(dialog.handle_key(KeyCode::Char('n')), ModalOutcome::Cancel);
        assert_eq!(dialog.handle_key(KeyCode::Char('x')), ModalOutcome::Stay);
    }
}
