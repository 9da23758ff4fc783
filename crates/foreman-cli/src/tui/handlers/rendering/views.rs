//! Main view rendering
//!
//! Section tabs, the entity list, and the drill-down pane beside it.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::App;
use crate::tui::modals::detail_lines;
use crate::tui::state::{visible_entities, Entity, Section};
use crate::tui::themes::Theme;
use crate::tui::utils::truncate_ellipsis;

/// Below this width the detail pane is dropped
const MIN_SPLIT_WIDTH: u16 = 90;

impl App {
    /// One tab per section with its (filtered) row count
    pub(super) fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let state = &self.state;
        let active = state.selection.section();
        let mut spans = vec![Span::raw(" ")];
        for (i, section) in Section::ALL.iter().enumerate() {
            let count =
                visible_entities(&state.snapshot, *section, state.filter.as_ref()).len();
            let style = if *section == active {
                Style::default()
                    .fg(self.theme.bg_color)
                    .bg(self.theme.accent_color)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.dim_color)
            };
            spans.push(Span::styled(
                format!(" {} {} ({count}) ", i + 1, section.title()),
                style,
            ));
            spans.push(Span::raw(" "));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    pub(super) fn render_main(&self, f: &mut Frame, area: Rect) {
        if area.width < MIN_SPLIT_WIDTH {
            self.render_list(f, area);
            return;
        }
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        self.render_list(f, columns[0]);
        self.render_detail_pane(f, columns[1]);
    }

    fn render_list(&self, f: &mut Frame, area: Rect) {
        let state = &self.state;
        let section = state.selection.section();
        let block = pane_block(section.title(), &self.theme);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut lines = Vec::new();
        // A sub-collection that failed to load is called out above its rows
        for error in state
            .snapshot
            .errors
            .iter()
            .filter(|e| section_name(section) == Some(e.section.as_str()))
        {
            lines.push(Line::from(Span::styled(
                truncate_ellipsis(
                    &format!("⚠ could not load {}: {}", section_noun(section), error.message),
                    inner.width as usize,
                ),
                Style::default().fg(self.theme.warning_color),
            )));
        }

        let entities = state.entities();
        if entities.is_empty() {
            let text = if !state.snapshot.initialized {
                "No workspace".to_string()
            } else if state.filter.is_some() {
                "Nothing matches the filter (Esc clears)".to_string()
            } else if state.refresh.last_refresh.is_none() {
                "Loading…".to_string()
            } else {
                format!("No {}", section.title().to_lowercase())
            };
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(self.theme.dim_color),
            )));
            f.render_widget(Paragraph::new(lines), inner);
            return;
        }

        let rows_available = (inner.height as usize).saturating_sub(lines.len()).max(1);
        let selected = state.selection.index().min(entities.len() - 1);
        let offset = selected.saturating_sub(rows_available - 1);

        for (i, entity) in entities
            .iter()
            .enumerate()
            .skip(offset)
            .take(rows_available)
        {
            lines.push(entity_row(entity, i == selected, inner.width, &self.theme));
        }
        f.render_widget(Paragraph::new(lines), inner);
    }

    fn render_detail_pane(&self, f: &mut Frame, area: Rect) {
        let state = &self.state;
        let key = state.selected_key();
        let title = key.map(|k| k.id.as_str()).unwrap_or("Details");
        let block = pane_block(title, &self.theme);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let lines = match key {
            Some(key) => detail_lines(state.detail.get(Some(key)), &key.id, &self.theme),
            None => vec![Line::from(Span::styled(
                "Nothing selected",
                Style::default().fg(self.theme.dim_color),
            ))],
        };
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

fn pane_block(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_color))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme.title_color)
                .add_modifier(Modifier::BOLD),
        ))
}

/// Snapshot error section names reported by the source
fn section_name(section: Section) -> Option<&'static str> {
    match section {
        Section::Queue => Some("queue"),
        Section::Work => Some("work"),
        _ => None,
    }
}

fn section_noun(section: Section) -> &'static str {
    match section {
        Section::Queue => "merge queue",
        _ => "work items",
    }
}

fn entity_row(entity: &Entity<'_>, selected: bool, width: u16, theme: &Theme) -> Line<'static> {
    let base = if selected {
        Style::default()
            .fg(theme.text_color)
            .bg(theme.highlight_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_color)
    };
    let dim = base.fg(theme.dim_color);
    let marker = Span::styled(if selected { "▶ " } else { "  " }, base.fg(theme.accent_color));

    let (name, state, state_color, extra) = match entity {
        Entity::Project(p) => (
            p.name.clone(),
            format!("max {}", p.settings.max_workers),
            theme.dim_color,
            p.repo_url.clone(),
        ),
        Entity::Worker(w) => (
            w.address(),
            w.state.to_string(),
            theme.worker_state_color(w.state),
            match (&w.work_item, &w.host) {
                (Some(item), Some(host)) => format!("{item} @ {host}"),
                (Some(item), None) => item.clone(),
                (None, Some(host)) => format!("@ {host}"),
                (None, None) => String::new(),
            },
        ),
        Entity::Manager(m) => (
            format!("{}/{}", m.project, m.role),
            if m.running { "running" } else { "stopped" }.to_string(),
            if m.running {
                theme.success_color
            } else {
                theme.dim_color
            },
            String::new(),
        ),
        Entity::Queue(q) => (
            format!("{}#{}", q.project, q.id),
            q.state.to_string(),
            theme.queue_state_color(q.state),
            format!("{} by {}", q.branch, q.author),
        ),
        Entity::Work(w) => (
            w.id.clone(),
            w.status.clone(),
            theme.text_color,
            w.title.clone(),
        ),
    };

    let name_width = 24usize;
    let state_width = 12usize;
    let extra_width = (width as usize).saturating_sub(2 + name_width + state_width + 2);
    Line::from(vec![
        marker,
        Span::styled(
            format!("{:<name_width$} ", truncate_ellipsis(&name, name_width)),
            base,
        ),
        Span::styled(
            format!("{:<state_width$} ", truncate_ellipsis(&state, state_width)),
            base.fg(state_color),
        ),
        Span::styled(truncate_ellipsis(&extra, extra_width), dim),
    ])
}
