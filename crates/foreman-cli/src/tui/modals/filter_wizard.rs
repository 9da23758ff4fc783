//! Three-step list filter wizard: field, value, confirm

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use foreman_core::Snapshot;

use super::common::{
    center_content, hint_line, modal_block, modal_title, render_modal_background, row_style,
    scroll_indicator, ModalSize,
};
use super::scroll::ScrollState;
use super::{ModalOutcome, Submission};
use crate::tui::state::{FilterField, ListFilter, Section};
use crate::tui::themes::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Field,
    Value,
    Confirm,
}

#[derive(Debug, Clone)]
pub struct FilterWizard {
    section: Section,
    step: WizardStep,
    field: usize,
    /// Candidate values per field, captured when the wizard opened
    values: [Vec<String>; 2],
    scroll: ScrollState,
}

impl FilterWizard {
    pub fn new(section: Section, snapshot: &Snapshot) -> Self {
        Self {
            section,
            step: WizardStep::Field,
            field: 0,
            values: [
                FilterField::Project.candidates(snapshot, section),
                FilterField::State.candidates(snapshot, section),
            ],
            scroll: ScrollState::new(FilterField::ALL.len()),
        }
    }

    #[cfg(test)]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    fn field(&self) -> FilterField {
        FilterField::ALL[self.field]
    }

    fn values(&self) -> &[String] {
        &self.values[self.field]
    }

    fn chosen(&self) -> Option<ListFilter> {
        self.values().get(self.scroll.selected).map(|value| ListFilter {
            field: self.field(),
            value: value.clone(),
        })
    }

    fn advance(&mut self) -> ModalOutcome {
        match self.step {
            WizardStep::Field => {
                self.field = self.scroll.selected;
                self.step = WizardStep::Value;
                self.scroll = ScrollState::new(self.values().len());
                ModalOutcome::Stay
            }
            WizardStep::Value => {
                if !self.values().is_empty() {
                    self.step = WizardStep::Confirm;
                }
                ModalOutcome::Stay
            }
            WizardStep::Confirm => match self.chosen() {
                Some(filter) => ModalOutcome::Submit(Submission::Filter(filter)),
                None => ModalOutcome::Stay,
            },
        }
    }

    fn back(&mut self) {
        match self.step {
            WizardStep::Field => {}
            WizardStep::Value => {
                self.step = WizardStep::Field;
                self.scroll = ScrollState::new(FilterField::ALL.len());
                self.scroll.selected = self.field;
            }
            WizardStep::Confirm => self.step = WizardStep::Value,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> ModalOutcome {
        match code {
            KeyCode::Esc => ModalOutcome::Cancel,
            KeyCode::Enter => self.advance(),
            KeyCode::Backspace | KeyCode::Left => {
                self.back();
                ModalOutcome::Stay
            }
            KeyCode::Up | KeyCode::Char('k') if self.step != WizardStep::Confirm => {
                self.scroll.prev();
                ModalOutcome::Stay
            }
            KeyCode::Down | KeyCode::Char('j') if self.step != WizardStep::Confirm => {
                self.scroll.next();
                ModalOutcome::Stay
            }
            _ => ModalOutcome::Stay,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let area = ModalSize::Medium.area(area);
        render_modal_background(f, area, theme);
        let block = modal_block(theme);
        let inner = center_content(block.inner(area), 2);
        f.render_widget(block, area);

        let step_number = match self.step {
            WizardStep::Field => 1,
            WizardStep::Value => 2,
            WizardStep::Confirm => 3,
        };
        let mut lines = modal_title(
            &format!("Filter {} ({step_number}/3)", self.section.title()),
            theme,
        );
        lines.push(Line::from(""));

        match self.step {
            WizardStep::Field | WizardStep::Value => {
                let options: Vec<String> = if self.step == WizardStep::Field {
                    FilterField::ALL.iter().map(|f| f.label().to_string()).collect()
                } else {
                    self.values().to_vec()
                };
                self.scroll
                    .set_visible_height((inner.height as usize).saturating_sub(8));
                if options.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("No {} values in this section", self.field().label()),
                        Style::default().fg(theme.dim_color),
                    )));
                }
                if self.scroll.items_above() > 0 {
                    lines.push(scroll_indicator("up", self.scroll.items_above(), theme));
                }
                for i in self.scroll.visible_range() {
                    let selected = i == self.scroll.selected;
                    let marker = if selected { "› " } else { "  " };
                    lines.push(Line::from(Span::styled(
                        format!("{marker}{}", options[i]),
                        row_style(selected, theme),
                    )));
                }
                if self.scroll.items_below() > 0 {
                    lines.push(scroll_indicator("down", self.scroll.items_below(), theme));
                }
            }
            WizardStep::Confirm => {
                if let Some(filter) = self.chosen() {
                    lines.push(Line::from(vec![
                        Span::styled("Show only ", Style::default().fg(theme.text_color)),
                        Span::styled(
                            filter.to_string(),
                            Style::default()
                                .fg(theme.accent_color)
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]));
                }
            }
        }

        lines.push(Line::from(""));
        let hints: &[(&str, &str)] = match self.step {
            WizardStep::Confirm => &[("Enter", "apply"), ("Backspace", "back"), ("Esc", "cancel")],
            _ => &[("↑↓", "choose"), ("Enter", "next"), ("Backspace", "back"), ("Esc", "cancel")],
        };
        lines.push(hint_line(hints, theme));

        f.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foreman_core::snapshot::{Worker, WorkerState};

    fn snapshot() -> Snapshot {
        let worker = |project: &str, name: &str, state| Worker {
            project: project.into(),
            name: name.into(),
            state,
            ..Worker::default()
        };
        Snapshot {
            workers: vec![
                worker("api", "w1", WorkerState::Idle),
                worker("web", "w2", WorkerState::Stalled),
            ],
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_three_steps_produce_filter() {
        let mut wizard = FilterWizard::new(Section::Workers, &snapshot());
        // Field: state
        wizard.handle_key(KeyCode::Down);
        assert_eq!(wizard.handle_key(KeyCode::Enter), ModalOutcome::Stay);
        assert_eq!(wizard.step(), WizardStep::Value);
        // Value: stalled
        wizard.handle_key(KeyCode::Down);
        wizard.handle_key(KeyCode::Enter);
        assert_eq!(wizard.step(), WizardStep::Confirm);

        assert_eq!(
            wizard.handle_key(KeyCode::Enter),
            ModalOutcome::Submit(Submission::Filter(ListFilter {
                field: FilterField::State,
                value: "stalled".into(),
            }))
        );
    }

    #[test]
    fn test_back_returns_to_previous_step() {
        let mut wizard = FilterWizard::new(Section::Workers, &snapshot());
        wizard.handle_key(KeyCode::Enter);
        wizard.handle_key(KeyCode::Backspace);
        assert_eq!(wizard.step(), WizardStep::Field);
        assert_eq!(wizard.handle_key(KeyCode::Esc), ModalOutcome::Cancel);
    }

    #[test]
    fn test_no_values_cannot_advance() {
        let mut wizard = FilterWizard::new(Section::Queue, &snapshot());
        wizard.handle_key(KeyCode::Enter);
        wizard.handle_key(KeyCode::Enter);
        assert_eq!(wizard.step(), WizardStep::Value);
    }
}
