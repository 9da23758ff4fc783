//! Dependency editor: multi-select of work items with type-to-search

use std::collections::BTreeSet;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use foreman_core::{ActionInput, ActionKind, ActionRequest, ActionTarget, Snapshot};

use super::common::{
    center_content, hint_line, modal_block, modal_title, render_modal_background, row_style,
    scroll_indicator, ModalSize,
};
use super::scroll::ScrollState;
use super::text_input::TextField;
use super::{ModalOutcome, Submission};
use crate::tui::themes::Theme;
use crate::tui::utils::truncate_ellipsis;

#[derive(Debug, Clone)]
struct Candidate {
    id: String,
    title: String,
}

#[derive(Debug, Clone)]
pub struct DependencyEditor {
    item: String,
    candidates: Vec<Candidate>,
    chosen: BTreeSet<String>,
    query: TextField,
    /// Indices into `candidates` matching the query
    matches: Vec<usize>,
    scroll: ScrollState,
}

impl DependencyEditor {
    /// Start from the item's current dependencies. The item itself is never
    /// offered.
    pub fn new(item: &str, snapshot: &Snapshot) -> Self {
        let candidates: Vec<Candidate> = snapshot
            .work_items
            .iter()
            .filter(|w| w.id != item)
            .map(|w| Candidate {
                id: w.id.clone(),
                title: w.title.clone(),
            })
            .collect();
        let chosen = snapshot
            .work_items
            .iter()
            .find(|w| w.id == item)
            .map(|w| w.depends_on.iter().cloned().collect())
            .unwrap_or_default();

        let mut editor = Self {
            item: item.to_string(),
            candidates,
            chosen,
            query: TextField::new(),
            matches: Vec::new(),
            scroll: ScrollState::default(),
        };
        editor.apply_query();
        editor
    }

    #[cfg(test)]
    pub fn chosen(&self) -> impl Iterator<Item = &str> {
        self.chosen.iter().map(String::as_str)
    }

    fn apply_query(&mut self) {
        let query = self.query.value().to_lowercase();
        self.matches = self
            .candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                query.is_empty()
                    || c.id.to_lowercase().contains(&query)
                    || c.title.to_lowercase().contains(&query)
            })
            .map(|(i, _)| i)
            .collect();
        self.scroll.set_total(self.matches.len());
    }

    fn toggle_selected(&mut self) {
        let Some(candidate) = self
            .matches
            .get(self.scroll.selected)
            .and_then(|i| self.candidates.get(*i))
        else {
            return;
        };
        if !self.chosen.remove(&candidate.id) {
            self.chosen.insert(candidate.id.clone());
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> ModalOutcome {
        match code {
            KeyCode::Esc => ModalOutcome::Cancel,
            KeyCode::Up => {
                self.scroll.prev();
                ModalOutcome::Stay
            }
            KeyCode::Down => {
                self.scroll.next();
                ModalOutcome::Stay
            }
            KeyCode::Char(' ') => {
                self.toggle_selected();
                ModalOutcome::Stay
            }
            KeyCode::Enter => {
                let ids: Vec<String> = self.chosen.iter().cloned().collect();
                ModalOutcome::Submit(Submission::Action(
                    ActionRequest::new(
                        ActionKind::SetDependencies,
                        ActionTarget::WorkItem(self.item.clone()),
                    )
                    .with_input(ActionInput::Selection(ids)),
                ))
            }
            _ => {
                if self.query.handle_key(code, modifiers) {
                    self.apply_query();
                }
                ModalOutcome::Stay
            }
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let area = ModalSize::Large.area(area);
        render_modal_background(f, area, theme);
        let block = modal_block(theme);
        let inner = center_content(block.inner(area), 2);
        f.render_widget(block, area);

        let mut lines = modal_title(&format!("Dependencies of {}", self.item), theme);
        let mut search = vec![Span::styled("Search: ", Style::default().fg(theme.dim_color))];
        search.extend(self.query.spans(true, theme));
        lines.push(Line::from(search));
        lines.push(Line::from(Span::styled(
            format!("{} selected", self.chosen.len()),
            Style::default().fg(theme.dim_color),
        )));
        self.scroll
            .set_visible_height((inner.height as usize).saturating_sub(10));

        if self.matches.is_empty() {
            lines.push(Line::from(Span::styled(
                "No matching work items",
                Style::default().fg(theme.dim_color),
            )));
        }
        if self.scroll.items_above() > 0 {
            lines.push(scroll_indicator("up", self.scroll.items_above(), theme));
        }
        let width = inner.width as usize;
        for row in self.scroll.visible_range() {
            let candidate = &self.candidates[self.matches[row]];
            let checked = if self.chosen.contains(&candidate.id) { "[x]" } else { "[ ]" };
            let text = format!("{checked} {:<10} {}", candidate.id, candidate.title);
            lines.push(Line::from(Span::styled(
                truncate_ellipsis(&text, width),
                row_style(row == self.scroll.selected, theme),
            )));
        }
        if self.scroll.items_below() > 0 {
            lines.push(scroll_indicator("down", self.scroll.items_below(), theme));
        }
        lines.push(Line::from(""));
        lines.push(hint_line(
            &[("type", "search"), ("Space", "toggle"), ("Enter", "save"), ("Esc", "cancel")],
            theme,
        ));

        f.render_widget(Paragraph::new(lines), inner);
    }
}
