//! Transient status line
//!
//! One message at a time, shown at the bottom of the screen until it expires.
//! Setting a new message replaces the current one.

use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::themes::Theme;
use crate::tui::utils::truncate_ellipsis;

/// Severity of a status message (affects color/icon)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral feedback: cancellations, progress notes
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    fn color(&self, theme: &Theme) -> Color {
        match self {
            Severity::Info => theme.text_color,
            Severity::Success => theme.success_color,
            Severity::Warning => theme.warning_color,
            Severity::Error => theme.error_color,
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Severity::Info => "·",
            Severity::Success => "✓",
            Severity::Warning => "!",
            Severity::Error => "✗",
        }
    }
}

/// A status message with its visibility window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

impl StatusMessage {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// The single status slot
#[derive(Debug, Default)]
pub struct StatusLine {
    current: Option<StatusMessage>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Replace the current message
    pub fn set(
        &mut self,
        text: impl Into<String>,
        severity: Severity,
        duration: Duration,
        now: Instant,
    ) {
        let text = text.into();
        tracing::debug!(?severity, "status: {}", text);
        self.current = Some(StatusMessage {
            text,
            severity,
            expires_at: now + duration,
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The message, if it is still inside its visibility window
    pub fn visible(&self, now: Instant) -> Option<&StatusMessage> {
        self.current.as_ref().filter(|m| !m.is_expired(now))
    }

    /// Drop an expired message, returns true if one was removed
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.current.as_ref().is_some_and(|m| m.is_expired(now)) {
            self.current = None;
            return true;
        }
        false
    }
}

/// Render the status line into a single-row area
pub fn render_status_line(
    f: &mut Frame,
    area: Rect,
    status: &StatusLine,
    theme: &Theme,
    now: Instant,
) {
    let Some(message) = status.visible(now) else {
        return;
    };
    let color = message.severity.color(theme);
    let max_width = (area.width as usize).saturating_sub(4);
    let mut style = Style::default().fg(color).bg(theme.bg_color);
    if message.severity == Severity::Error {
        style = style.add_modifier(Modifier::BOLD);
    }

    let line = Line::from(vec![
        Span::styled(format!(" {} ", message.severity.icon()), style),
        Span::styled(truncate_ellipsis(&message.text, max_width), style),
    ]);
    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.bg_color)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_visible_until_expiry() {
        let now = Instant::now();
        let mut status = StatusLine::new();
        status.set("Saved", Severity::Success, Duration::from_secs(4), now);

        assert!(status.visible(now).is_some());
        assert!(status.visible(now + Duration::from_millis(3999)).is_some());
        assert!(status.visible(now + Duration::from_secs(4)).is_none());
    }

    #[test]
    fn test_new_message_replaces_current() {
        let now = Instant::now();
        let mut status = StatusLine::new();
        status.set("first", Severity::Info, Duration::from_secs(4), now);
        status.set("second", Severity::Error, Duration::from_secs(8), now);

        let shown = status.visible(now).unwrap();
        assert_eq!(shown.text, "second");
        assert_eq!(shown.severity, Severity::Error);
    }

    #[test]
    fn test_tick_removes_expired() {
        let now = Instant::now();
        let mut status = StatusLine::new();
        status.set("gone soon", Severity::Info, Duration::from_secs(1), now);

        assert!(!status.tick(now));
        assert!(status.tick(now + Duration::from_secs(2)));
        assert!(status.visible(now).is_none());
    }
}
