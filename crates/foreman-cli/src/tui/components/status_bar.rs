//! Header and footer bars

use std::time::Duration;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::modals::section_keys;
use crate::tui::state::Section;
use crate::tui::themes::Theme;
use crate::tui::utils::format_elapsed;

/// Connection and activity summary shown in the header
pub struct HeaderInfo<'a> {
    pub connected: bool,
    pub refreshing: bool,
    pub since_refresh: Option<Duration>,
    pub error_count: usize,
    pub pending_actions: usize,
    /// Longest-running action and how long it has been going
    pub oldest_action: Option<(String, Duration)>,
    pub filter: Option<String>,
    pub bin: &'a str,
}

/// Render the top bar: title on the left, fleet health on the right
pub fn render_header(f: &mut Frame, area: Rect, theme: &Theme, info: &HeaderInfo<'_>) {
    let bg = Paragraph::new("").style(Style::default().bg(theme.status_bar_bg_color));
    f.render_widget(bg, area);

    let sep = || Span::styled(" │ ", Style::default().fg(theme.dim_color));
    let left = Line::from(vec![
        Span::styled(
            " FOREMAN ",
            Style::default()
                .fg(theme.title_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(info.bin.to_string(), Style::default().fg(theme.dim_color)),
    ]);

    let mut right = Vec::new();
    if let Some(filter) = &info.filter {
        right.push(Span::styled(
            format!("filter {filter}"),
            Style::default().fg(theme.accent_color),
        ));
        right.push(sep());
    }
    if info.pending_actions > 0 {
        let running = match &info.oldest_action {
            Some((label, elapsed)) if info.pending_actions == 1 => {
                format!("{label} ({})", format_elapsed(*elapsed))
            }
            Some((label, elapsed)) => format!(
                "{} running, oldest {label} ({})",
                info.pending_actions,
                format_elapsed(*elapsed)
            ),
            None => format!("{} running", info.pending_actions),
        };
        right.push(Span::styled(running, Style::default().fg(theme.accent_color)));
        right.push(sep());
    }
    if info.error_count > 0 {
        right.push(Span::styled(
            format!("{} errors", info.error_count),
            Style::default().fg(theme.warning_color),
        ));
        right.push(sep());
    }
    let refreshed = match (info.refreshing, info.since_refresh) {
        (true, _) => "refreshing…".to_string(),
        (false, Some(elapsed)) => format!("updated {} ago", format_elapsed(elapsed)),
        (false, None) => "waiting for first refresh".to_string(),
    };
    right.push(Span::styled(refreshed, Style::default().fg(theme.dim_color)));
    right.push(sep());
    right.push(if info.connected {
        Span::styled("● connected ", Style::default().fg(theme.success_color))
    } else {
        Span::styled("○ disconnected ", Style::default().fg(theme.error_color))
    });

    let right = Line::from(right);
    let right_width = right.width() as u16;
    let left_width = area.width.saturating_sub(right_width);
    f.render_widget(
        Paragraph::new(left),
        Rect {
            width: left_width,
            ..area
        },
    );
    f.render_widget(
        Paragraph::new(right).alignment(Alignment::Right),
        Rect {
            x: area.x + left_width,
            width: area.width - left_width,
            ..area
        },
    );
}

/// Render the bottom bar with keys for the active section
pub fn render_key_hints(f: &mut Frame, area: Rect, theme: &Theme, section: Section) {
    let bg = Paragraph::new("").style(Style::default().bg(theme.status_bar_bg_color));
    f.render_widget(bg, area);

    let mut spans = vec![Span::raw(" ")];
    let mut width = 1;
    let common = [("?", "help"), ("/", "filter"), ("r", "refresh"), ("q", "quit")];
    for (key, action) in section_keys(section).iter().chain(common.iter()) {
        let entry = format!("{key} {action}  ");
        width += entry.width();
        if width > area.width as usize {
            break;
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(theme.accent_color),
        ));
        spans.push(Span::styled(
            format!(" {action}  "),
            Style::default().fg(theme.dim_color),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.status_bar_bg_color)),
        area,
    );
}
