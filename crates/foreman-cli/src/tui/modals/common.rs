//! Common modal rendering utilities

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear},
    Frame,
};

use crate::tui::themes::Theme;

/// Standard modal sizes (fixed width x height in characters)
#[derive(Debug, Clone, Copy)]
pub enum ModalSize {
    /// Confirmations, single-field prompts
    Small,
    /// Menus, forms, the filter wizard
    Medium,
    /// Help, detail, dependency editor
    Large,
}

impl ModalSize {
    /// Fixed dimensions (width, height) in characters
    pub fn dimensions(&self) -> (u16, u16) {
        match self {
            ModalSize::Small => (56, 12),
            ModalSize::Medium => (64, 20),
            ModalSize::Large => (84, 30),
        }
    }

    /// Centered area of this size inside `area`
    pub fn area(&self, area: Rect) -> Rect {
        let (w, h) = self.dimensions();
        center_rect(w, h, area)
    }
}

/// Calculate centered area with fixed size (not percentage)
pub fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(2));

    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    Rect::new(x, y, popup_width, popup_height)
}

/// Clear the area and paint the theme background
pub fn render_modal_background(f: &mut Frame, area: Rect, theme: &Theme) {
    f.render_widget(Clear, area);
    let bg = Block::default().style(Style::default().bg(theme.bg_color));
    f.render_widget(bg, area);
}

/// Standard modal block with rounded borders
pub fn modal_block(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_color))
        .style(Style::default().bg(theme.bg_color))
}

/// Title lines with a separator matching the title width
pub fn modal_title(title: &str, theme: &Theme) -> Vec<Line<'static>> {
    let sep_len = title.chars().count().max(16);
    let separator: String = "═".repeat(sep_len);

    vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme.title_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            separator,
            Style::default().fg(theme.border_color),
        )),
    ]
}

/// Dimmed key hint line, e.g. `Enter submit · Esc cancel`
pub fn hint_line(hints: &[(&str, &str)], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(theme.dim_color)));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(theme.accent_color),
        ));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(theme.dim_color),
        ));
    }
    Line::from(spans)
}

/// Inline validation error
pub fn error_line(message: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!("✗ {message}"),
        Style::default().fg(theme.error_color),
    ))
}

/// Scroll indicator line
pub fn scroll_indicator(direction: &str, count: usize, theme: &Theme) -> Line<'static> {
    let arrow = if direction == "up" { "↑" } else { "↓" };
    let text = format!(
        "{} {} more {}",
        arrow,
        count,
        if direction == "up" { "above" } else { "below" }
    );

    Line::from(Span::styled(
        text,
        Style::default()
            .fg(theme.dim_color)
            .add_modifier(Modifier::DIM),
    ))
}

/// Row style for list entries
pub fn row_style(selected: bool, theme: &Theme) -> Style {
    if selected {
        Style::default()
            .fg(theme.accent_color)
            .bg(theme.highlight_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_color)
    }
}

/// Add horizontal padding to center content within a rect
pub fn center_content(area: Rect, padding: u16) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(padding),
            Constraint::Min(0),
            Constraint::Length(padding),
        ])
        .split(area)[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = center_rect(84, 30, area);
        assert_eq!(rect.width, 36);
        assert_eq!(rect.height, 8);
        assert_eq!(rect.x, 2);
        assert_eq!(rect.y, 1);
    }
}
