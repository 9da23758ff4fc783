//! Key reference overlay

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
use crate::tui::state::Section;
use crate::tui::themes::Theme;

/// Keys available in every section
pub const GLOBAL_KEYS: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "next / previous section"),
    ("j k ↑ ↓", "move"),
    ("g G", "first / last"),
    ("Enter", "details"),
    ("r", "refresh now"),
    ("/", "filter"),
    ("Esc", "clear filter or status"),
    (",", "global settings"),
    ("Q", "shut down fleet"),
    ("?", "this help"),
    ("q / Ctrl+C", "quit"),
];

/// Keys for the selected entity in `section`
pub fn section_keys(section: Section) -> &'static [(&'static str, &'static str)] {
    match section {
        Section::Projects => &[
            ("s", "spawn worker"),
            ("e", "edit settings"),
            ("p", "process merge queue"),
            ("N", "add project"),
            ("D", "remove project"),
        ],
        Section::Workers => &[
            ("s", "spawn worker"),
            ("R", "restart"),
            ("x", "stop"),
            ("X", "nuke"),
            ("n", "nudge"),
            ("m", "mail"),
            ("a", "attach"),
        ],
        Section::Managers => &[("w", "start"), ("W", "stop")],
        Section::Queue => &[
            ("y", "retry merge"),
            ("d", "reject merge"),
            ("v", "queue board"),
        ],
        Section::Work => &[
            ("o", "assign to project"),
            ("b", "edit dependencies"),
        ],
    }
}

#[derive(Debug, Clone)]
pub struct HelpOverlay {
    section: Section,
    scroll: u16,
}

impl HelpOverlay {
    pub fn new(section: Section) -> Self {
        Self { section, scroll: 0 }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> ModalOutcome {
        match code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => ModalOutcome::Cancel,
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                ModalOutcome::Stay
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                ModalOutcome::Stay
            }
            _ => ModalOutcome::Stay,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let area = ModalSize::Large.area(area);
        render_modal_background(f, area, theme);
        let block = modal_block(theme);
        let inner = center_content(block.inner(area), 3);
        f.render_widget(block, area);

        let heading = |text: String| {
            Line::from(Span::styled(
                text,
                Style::default()
                    .fg(theme.title_color)
                    .add_modifier(Modifier::BOLD),
            ))
        };
        let entry = |key: &str, action: &str| {
            Line::from(vec![
                Span::styled(format!("  {key:<18}"), Style::default().fg(theme.accent_color)),
                Span::styled(action.to_string(), Style::default().fg(theme.text_color)),
            ])
        };

        let mut lines = modal_title("Keys", theme);
        lines.push(Line::from(""));
        lines.push(heading("Everywhere".to_string()));
        lines.extend(GLOBAL_KEYS.iter().map(|(k, a)| entry(k, a)));
        lines.push(Line::from(""));
        lines.push(heading(self.section.title().to_string()));
        lines.extend(section_keys(self.section).iter().map(|(k, a)| entry(k, a)));
        lines.push(Line::from(""));
        lines.push(hint_line(&[("j/k", "scroll"), ("Esc", "close")], theme));

        f.render_widget(Paragraph::new(lines).scroll((self.scroll, 0)), inner);
    }
}
