//! UI rendering coordinator
//!
//! Main entry point that dispatches to specialized render modules.

mod views;

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::tui::app::App;
use crate::tui::components::{render_header, render_key_hints, render_status_line, HeaderInfo};
use crate::tui::modals::{ModalKind, ModalView};

impl App {
    /// Main UI rendering dispatcher
    pub fn ui(&mut self, f: &mut Frame) {
        let now = Instant::now();
        let bg = Block::default().style(Style::default().bg(self.theme.bg_color));
        f.render_widget(bg, f.area());

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(1), // section tabs
                Constraint::Min(3),    // list + detail
                Constraint::Length(1), // status line
                Constraint::Length(1), // key hints
            ])
            .split(f.area());

        let state = &self.state;
        let info = HeaderInfo {
            connected: state.refresh.connected,
            refreshing: state.refresh.is_refreshing(),
            since_refresh: state
                .refresh
                .last_refresh
                .map(|at| now.saturating_duration_since(at)),
            error_count: state.refresh.error_count,
            pending_actions: state.pending.len(),
            oldest_action: state.pending.oldest().map(|a| {
                (
                    format!("{} {}", a.kind.label(), a.target),
                    now.saturating_duration_since(a.started_at),
                )
            }),
            filter: state.filter.as_ref().map(ToString::to_string),
            bin: &self.bin,
        };
        render_header(f, rows[0], &self.theme, &info);

        // The queue board replaces the main view instead of floating over it
        if self.state.modals.kind() == Some(ModalKind::QueueBoard) {
            self.render_modal(f, rows[1].union(rows[2]));
        } else {
            self.render_tabs(f, rows[1]);
            self.render_main(f, rows[2]);
            self.render_modal(f, f.area());
        }

        render_status_line(f, rows[3], &self.state.status, &self.theme, now);
        render_key_hints(f, rows[4], &self.theme, self.state.selection.section());
    }

    fn render_modal(&mut self, f: &mut Frame, area: Rect) {
        let state = &mut self.state;
        let detail = state.detail.get(state.selection.key());
        let view = ModalView {
            snapshot: &state.snapshot,
            detail,
            theme: &self.theme,
        };
        if let Some(modal) = state.modals.active_mut() {
            modal.render(f, area, &view);
        }
    }
}
