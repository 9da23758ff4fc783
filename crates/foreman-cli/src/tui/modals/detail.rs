//! Drill-down view for the selected entity
//!
//! Renders whatever the detail cache holds for the key it was opened on. The
//! cache only answers for the current selection, so a stale load is never
//! shown here.

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::common::{center_content, hint_line, modal_block, modal_title, render_modal_background, ModalSize};
use super::ModalOutcome;
use crate::tui::state::{DetailState, EntityKey};
use crate::tui::themes::Theme;

#[derive(Debug, Clone)]
pub struct DetailView {
    key: EntityKey,
    scroll: u16,
}

impl DetailView {
    pub fn new(key: EntityKey) -> Self {
        Self { key, scroll: 0 }
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn handle_key(&mut self, code: KeyCode) -> ModalOutcome {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => ModalOutcome::Cancel,
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                ModalOutcome::Stay
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                ModalOutcome::Stay
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                ModalOutcome::Stay
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                ModalOutcome::Stay
            }
            _ => ModalOutcome::Stay,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, detail: Option<&DetailState>, theme: &Theme) {
        let area = ModalSize::Large.area(area);
        render_modal_background(f, area, theme);
        let block = modal_block(theme);
        let inner = center_content(block.inner(area), 2);
        f.render_widget(block, area);

        let mut lines = modal_title(&self.key.id, theme);
        lines.push(Line::from(""));
        lines.extend(detail_lines(detail, &self.key.id, theme));

        let hint_area = Rect {
            y: inner.y + inner.height.saturating_sub(1),
            height: 1.min(inner.height),
            ..inner
        };
        let body = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        f.render_widget(Paragraph::new(lines).scroll((self.scroll, 0)), body);
        f.render_widget(
            Paragraph::new(hint_line(&[("j/k", "scroll"), ("Esc", "close")], theme)),
            hint_area,
        );
    }
}

/// Body lines for a drill-down, shared by the side pane and the overlay.
/// `heading` suppresses a title that only repeats the entity id.
pub fn detail_lines(detail: Option<&DetailState>, heading: &str, theme: &Theme) -> Vec<Line<'static>> {
    let dim = Style::default().fg(theme.dim_color);
    let mut lines = Vec::new();
    match detail {
        None => lines.push(Line::from(Span::styled(
            "This entity is no longer selected",
            dim,
        ))),
        Some(DetailState::Loading) => lines.push(Line::from(Span::styled("Loading…", dim))),
        Some(DetailState::Failed(message)) => lines.push(Line::from(Span::styled(
            format!("Could not load details: {message}"),
            Style::default().fg(theme.error_color),
        ))),
        Some(DetailState::Loaded(detail)) => {
            if !detail.title.is_empty() && detail.title != heading {
                lines.push(Line::from(Span::styled(
                    detail.title.clone(),
                    Style::default()
                        .fg(theme.text_color)
                        .add_modifier(Modifier::BOLD),
                )));
            }
            for (name, value) in &detail.fields {
                lines.push(Line::from(vec![
                    Span::styled(format!("{name:<16}"), dim),
                    Span::styled(value.clone(), Style::default().fg(theme.text_color)),
                ]));
            }
            if !detail.recent_output.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Recent output",
                    Style::default()
                        .fg(theme.title_color)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.extend(
                    detail
                        .recent_output
                        .iter()
                        .map(|l| Line::from(Span::styled(l.clone(), dim))),
                );
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::Section;

    #[test]
    fn test_scroll_and_close() {
        let mut view = DetailView::new(EntityKey {
            section: Section::Workers,
            id: "api/w1".into(),
        });
        view.handle_key(KeyCode::Char('j'));
        view.handle_key(KeyCode::Char('j'));
        view.handle_key(KeyCode::Char('k'));
        assert_eq!(view.scroll, 1);
        assert_eq!(view.handle_key(KeyCode::Esc), ModalOutcome::Cancel);
    }
}
