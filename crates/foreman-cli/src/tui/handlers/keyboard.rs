//! Keyboard event handlers
//!
//! Keys go to the active modal when there is one; otherwise to the default
//! layout below. Ctrl+C quits from anywhere, including setup.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use foreman_core::{ActionKind, ActionRequest, ActionTarget};

use crate::tui::components::Severity;
use crate::tui::modals::{
    DependencyEditor, FilterWizard, HelpOverlay, Modal, QueueBoard, RemoteAttachDialog,
    SelectMenu, SettingsForm, TextInputDialog,
};
use crate::tui::state::{ControlState, Entity, Section};

/// What a key on the selected entity asks for
enum Intent {
    Request(ActionRequest),
    Open(Modal),
}

impl ControlState {
    /// Main keyboard event dispatcher
    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let code = key.code;
        let modifiers = key.modifiers;

        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.modals.is_open() {
            self.handle_modal_key(code, modifiers);
            return;
        }

        self.handle_default_key(code);
    }

    fn handle_default_key(&mut self, code: KeyCode) {
        let section = self.selection.section();
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.switch_section(section.next()),
            KeyCode::BackTab => self.switch_section(section.prev()),
            KeyCode::Char(c @ '1'..='5') => {
                let index = (c as u8 - b'1') as usize;
                self.switch_section(Section::ALL[index]);
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::PageDown => self.move_cursor(10),
            KeyCode::PageUp => self.move_cursor(-10),
            KeyCode::Home | KeyCode::Char('g') => self.move_cursor(isize::MIN),
            KeyCode::End | KeyCode::Char('G') => self.move_cursor(isize::MAX),
            KeyCode::Enter => self.open_detail(),
            KeyCode::Char('r') => {
                self.request_refresh();
                self.notify("Refreshing…", Severity::Info);
            }
            KeyCode::Char('?') => self.modals.open(Modal::Help(HelpOverlay::new(section))),
            KeyCode::Char('/') => self
                .modals
                .open(Modal::FilterWizard(FilterWizard::new(section, &self.snapshot))),
            KeyCode::Esc => {
                if self.filter.is_some() {
                    self.set_filter(None);
                    self.notify("Filter cleared", Severity::Info);
                } else {
                    self.status.clear();
                }
            }
            KeyCode::Char(',') => self
                .modals
                .open(Modal::Form(SettingsForm::global(&self.snapshot.settings))),
            KeyCode::Char('Q') => {
                self.request_action(ActionRequest::new(ActionKind::ShutdownAll, ActionTarget::Global))
            }
            KeyCode::Char('N') => self
                .modals
                .open(Modal::TextInput(TextInputDialog::add_project())),
            KeyCode::Char('v') if section == Section::Queue => {
                self.modals.open(Modal::QueueBoard(QueueBoard::new()))
            }
            _ => self.handle_entity_key(code),
        }
    }

    /// Keys that act on the selected entity
    fn handle_entity_key(&mut self, code: KeyCode) {
        let Some(entity) = self.selected_entity() else {
            return;
        };
        let target = entity.target();
        let act = |kind| Intent::Request(ActionRequest::new(kind, target.clone()));

        let intent = match (entity, code) {
            (Entity::Project(p), KeyCode::Char('s')) => {
                Intent::Open(Modal::PresetMenu(SelectMenu::presets(&p.name, &self.snapshot)))
            }
            (Entity::Project(p), KeyCode::Char('e')) => {
                Intent::Open(Modal::Form(SettingsForm::project(p)))
            }
            (Entity::Project(_), KeyCode::Char('p')) => act(ActionKind::ProcessQueue),
            (Entity::Project(_), KeyCode::Char('D')) => act(ActionKind::RemoveProject),

            (Entity::Worker(w), KeyCode::Char('s')) => {
                Intent::Open(Modal::PresetMenu(SelectMenu::presets(&w.project, &self.snapshot)))
            }
            (Entity::Worker(_), KeyCode::Char('R')) => act(ActionKind::RestartWorker),
            (Entity::Worker(_), KeyCode::Char('x')) => act(ActionKind::StopWorker),
            (Entity::Worker(_), KeyCode::Char('X')) => act(ActionKind::NukeWorker),
            (Entity::Worker(_), KeyCode::Char('n')) => {
                Intent::Open(Modal::TextInput(TextInputDialog::nudge(target.clone())))
            }
            (Entity::Worker(_), KeyCode::Char('m')) => {
                Intent::Open(Modal::TextInput(TextInputDialog::mail(target.clone())))
            }
            (Entity::Worker(w), KeyCode::Char('a')) => {
                Intent::Open(Modal::RemoteAttach(RemoteAttachDialog::new(w)))
            }

            (Entity::Manager(_), KeyCode::Char('w')) => act(ActionKind::StartManager),
            (Entity::Manager(_), KeyCode::Char('W')) => act(ActionKind::StopManager),

            (Entity::Queue(_), KeyCode::Char('y')) => act(ActionKind::RetryMerge),
            (Entity::Queue(_), KeyCode::Char('d')) => act(ActionKind::RejectMerge),

            (Entity::Work(w), KeyCode::Char('o')) => Intent::Open(Modal::DestinationMenu(
                SelectMenu::destinations(&w.id, w.project.as_deref(), &self.snapshot),
            )),
            (Entity::Work(w), KeyCode::Char('b')) => {
                Intent::Open(Modal::DependencyEditor(DependencyEditor::new(&w.id, &self.snapshot)))
            }
            _ => return,
        };

        match intent {
            Intent::Request(request) => self.request_action(request),
            Intent::Open(modal) => self.modals.open(modal),
        }
    }
}
