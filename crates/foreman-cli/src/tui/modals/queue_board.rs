//! Merge queue board
//!
//! Alternate full-screen view: one column per queue state. Retry and reject
//! act on the highlighted entry and leave the board.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use foreman_core::snapshot::{QueueEntry, QueueState};
use foreman_core::{ActionKind, ActionRequest, ActionTarget, Snapshot};

use super::common::{hint_line, render_modal_background, row_style};
use super::{ModalOutcome, Submission};
use crate::tui::themes::Theme;
use crate::tui::utils::truncate_ellipsis;

const COLUMNS: [QueueState; 5] = [
    QueueState::Queued,
    QueueState::Merging,
    QueueState::Conflicted,
    QueueState::Failed,
    QueueState::Unknown,
];

#[derive(Debug, Clone, Default)]
pub struct QueueBoard {
    column: usize,
    row: usize,
}

fn column_entries(snapshot: &Snapshot, state: QueueState) -> Vec<&QueueEntry> {
    snapshot
        .merge_queue
        .iter()
        .filter(|e| e.state == state)
        .collect()
}

impl QueueBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn selected<'a>(&self, snapshot: &'a Snapshot) -> Option<&'a QueueEntry> {
        column_entries(snapshot, COLUMNS[self.column])
            .get(self.row)
            .copied()
    }

    fn act(&self, kind: ActionKind, snapshot: &Snapshot) -> ModalOutcome {
        match self.selected(snapshot) {
            Some(entry) => ModalOutcome::Submit(Submission::Action(ActionRequest::new(
                kind,
                ActionTarget::QueueEntry {
                    project: entry.project.clone(),
                    id: entry.id.clone(),
                },
            ))),
            None => ModalOutcome::Stay,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, snapshot: &Snapshot) -> ModalOutcome {
        match code {
            KeyCode::Esc | KeyCode::Char('v') | KeyCode::Char('q') => return ModalOutcome::Cancel,
            KeyCode::Left | KeyCode::Char('h') => {
                self.column = (self.column + COLUMNS.len() - 1) % COLUMNS.len();
                self.row = 0;
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                self.column = (self.column + 1) % COLUMNS.len();
                self.row = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => self.row = self.row.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                let len = column_entries(snapshot, COLUMNS[self.column]).len();
                if self.row + 1 < len {
                    self.row += 1;
                }
            }
            KeyCode::Char('y') => return self.act(ActionKind::RetryMerge, snapshot),
            KeyCode::Char('d') => return self.act(ActionKind::RejectMerge, snapshot),
            _ => {}
        }
        ModalOutcome::Stay
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
        render_modal_background(f, area, theme);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    " Merge Queue ",
                    Style::default()
                        .fg(theme.title_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{} entries", snapshot.merge_queue.len()),
                    Style::default().fg(theme.dim_color),
                ),
            ])),
            rows[0],
        );

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, COLUMNS.len() as u32); COLUMNS.len()])
            .split(rows[1]);

        for (i, state) in COLUMNS.iter().enumerate() {
            let entries = column_entries(snapshot, *state);
            if i == self.column && self.row >= entries.len() {
                self.row = entries.len().saturating_sub(1);
            }
            let focused = i == self.column;
            let border = if focused { theme.accent_color } else { theme.border_color };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(Span::styled(
                    format!(" {} ({}) ", state, entries.len()),
                    Style::default().fg(theme.queue_state_color(*state)),
                ));
            let inner = block.inner(columns[i]);
            f.render_widget(block, columns[i]);

            let width = inner.width as usize;
            let lines: Vec<Line> = entries
                .iter()
                .enumerate()
                .flat_map(|(row, entry)| {
                    let style = row_style(focused && row == self.row, theme);
                    [
                        Line::from(Span::styled(
                            truncate_ellipsis(&format!("{}#{}", entry.project, entry.id), width),
                            style,
                        )),
                        Line::from(Span::styled(
                            truncate_ellipsis(&format!("  {} · {}", entry.branch, entry.author), width),
                            Style::default().fg(theme.dim_color),
                        )),
                    ]
                })
                .collect();
            f.render_widget(Paragraph::new(lines), inner);
        }

        f.render_widget(
            Paragraph::new(hint_line(
                &[("←→", "column"), ("↑↓", "entry"), ("y", "retry"), ("d", "reject"), ("Esc", "back")],
                theme,
            )),
            rows[2],
        );
    }
}
