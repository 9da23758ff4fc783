//! Single-choice menus: worker presets and work destinations

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use foreman_core::constants::platform::BUILTIN_PRESETS;
use foreman_core::{ActionInput, ActionKind, ActionRequest, ActionTarget, Snapshot};

use super::common::{
    center_content, hint_line, modal_block, modal_title, render_modal_background, row_style,
    scroll_indicator, ModalSize,
};
use super::scroll::ScrollState;
use super::{ModalOutcome, Submission};
use crate::tui::themes::Theme;

/// What choosing an option does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuPurpose {
    /// Spawn a worker in `project` with the chosen preset
    Preset { project: String },
    /// Assign work item `item` to the chosen project
    Destination { item: String },
}

#[derive(Debug, Clone)]
pub struct SelectMenu {
    title: String,
    purpose: MenuPurpose,
    options: Vec<String>,
    scroll: ScrollState,
}

impl SelectMenu {
    /// Presets, with the fleet default first
    pub fn presets(project: &str, snapshot: &Snapshot) -> Self {
        let default = snapshot.settings.default_preset.clone();
        let mut options = vec![default.clone()];
        options.extend(
            BUILTIN_PRESETS
                .iter()
                .filter(|p| **p != default)
                .map(|p| p.to_string()),
        );
        Self::new(
            format!("Spawn worker in {project}"),
            MenuPurpose::Preset {
                project: project.to_string(),
            },
            options,
        )
    }

    /// Every project except the one the item already belongs to
    pub fn destinations(item: &str, current: Option<&str>, snapshot: &Snapshot) -> Self {
        let options = snapshot
            .projects
            .iter()
            .map(|p| p.name.clone())
            .filter(|name| Some(name.as_str()) != current)
            .collect();
        Self::new(
            format!("Assign {item} to"),
            MenuPurpose::Destination {
                item: item.to_string(),
            },
            options,
        )
    }

    fn new(title: String, purpose: MenuPurpose, options: Vec<String>) -> Self {
        let scroll = ScrollState::new(options.len());
        Self {
            title,
            purpose,
            options,
            scroll,
        }
    }

    #[cfg(test)]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    fn request(&self, choice: String) -> ActionRequest {
        match &self.purpose {
            MenuPurpose::Preset { project } => {
                ActionRequest::new(ActionKind::SpawnWorker, ActionTarget::Project(project.clone()))
                    .with_input(ActionInput::Choice(choice))
            }
            MenuPurpose::Destination { item } => {
                ActionRequest::new(ActionKind::AssignWork, ActionTarget::WorkItem(item.clone()))
                    .with_input(ActionInput::Choice(choice))
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> ModalOutcome {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => ModalOutcome::Cancel,
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll.prev();
                ModalOutcome::Stay
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll.next();
                ModalOutcome::Stay
            }
            KeyCode::Enter => match self.options.get(self.scroll.selected) {
                Some(choice) => ModalOutcome::Submit(Submission::Action(self.request(choice.clone()))),
                None => ModalOutcome::Stay,
            },
            _ => ModalOutcome::Stay,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let area = ModalSize::Medium.area(area);
        render_modal_background(f, area, theme);
        let block = modal_block(theme);
        let inner = center_content(block.inner(area), 2);
        f.render_widget(block, area);

        let mut lines = modal_title(&self.title, theme);
        lines.push(Line::from(""));
        // title (3) + blank + indicators (2) + blank + hints
        self.scroll
            .set_visible_height((inner.height as usize).saturating_sub(8));

        if self.options.is_empty() {
            lines.push(Line::from(Span::styled(
                "Nothing to choose from",
                Style::default().fg(theme.dim_color),
            )));
        } else {
            if self.scroll.items_above() > 0 {
                lines.push(scroll_indicator("up", self.scroll.items_above(), theme));
            }
            for i in self.scroll.visible_range() {
                let selected = i == self.scroll.selected;
                let marker = if selected { "› " } else { "  " };
                lines.push(Line::from(Span::styled(
                    format!("{marker}{}", self.options[i]),
                    row_style(selected, theme),
                )));
            }
            if self.scroll.items_below() > 0 {
                lines.push(scroll_indicator("down", self.scroll.items_below(), theme));
            }
        }
        lines.push(Line::from(""));
        lines.push(hint_line(&[("↑↓", "choose"), ("Enter", "select"), ("Esc", "cancel")], theme));

        f.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foreman_core::snapshot::Project;

    #[test]
    fn test_default_preset_listed_first_once() {
        let mut snapshot = Snapshot::default();
        snapshot.settings.default_preset = "fast".into();
        let menu = SelectMenu::presets("api", &snapshot);
        assert_eq!(menu.options()[0], "fast");
        assert_eq!(menu.options().iter().filter(|o| *o == "fast").count(), 1);
    }

    #[test]
    fn test_preset_choice_builds_spawn_request() {
        let snapshot = Snapshot::default();
        let mut menu = SelectMenu::presets("api", &snapshot);
        menu.handle_key(KeyCode::Down);
        match menu.handle_key(KeyCode::Enter) {
            ModalOutcome::Submit(Submission::Action(request)) => {
                assert_eq!(request.kind, ActionKind::SpawnWorker);
                assert_eq!(request.target, ActionTarget::Project("api".into()));
                assert_eq!(request.input, Some(ActionInput::Choice("fast".into())));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_destinations_skip_current_project() {
        let mut snapshot = Snapshot::default();
        for name in ["api", "web"] {
            snapshot.projects.push(Project {
                name: name.into(),
                ..Project::default()
            });
        }
        let mut menu = SelectMenu::destinations("fl-12", Some("api"), &snapshot);
        assert_eq!(menu.options(), ["web".to_string()]);
        assert!(matches!(
            menu.handle_key(KeyCode::Enter),
            ModalOutcome::Submit(Submission::Action(_))
        ));
    }

    #[test]
    fn test_empty_menu_stays_open() {
        let mut menu = SelectMenu::destinations("fl-12", None, &Snapshot::default());
        assert_eq!(menu.handle_key(KeyCode::Enter), ModalOutcome::Stay);
        assert_eq!(menu.handle_key(KeyCode::Esc), ModalOutcome::Cancel);
    }
}
