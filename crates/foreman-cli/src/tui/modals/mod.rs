//! Modal contexts
//!
//! At most one modal is active. While it is, it receives every key; otherwise
//! keys go to the default layout. User-initiated opens replace whatever is
//! active. System-initiated offers (first-run setup) only win against modals
//! they outrank.

mod common;
mod confirm;
mod dependency_editor;
mod detail;
mod filter_wizard;
mod form;
mod help;
mod menu;
mod queue_board;
mod remote_attach;
mod scroll;
mod setup;
mod text_input;

pub use confirm::{ConfirmDialog, Confirmed};
pub use dependency_editor::DependencyEditor;
pub use detail::{detail_lines, DetailView};
pub use filter_wizard::FilterWizard;
pub use form::SettingsForm;
pub use help::{section_keys, HelpOverlay};
pub use menu::SelectMenu;
pub use queue_board::QueueBoard;
pub use remote_attach::RemoteAttachDialog;
pub use setup::SetupDialog;
pub use text_input::TextInputDialog;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{layout::Rect, Frame};

use foreman_core::{ActionRequest, Snapshot};

use crate::tui::state::{DetailState, ListFilter};
use crate::tui::themes::Theme;

/// What a modal hands back when it completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Dispatch, asking for confirmation first if the action needs it
    Action(ActionRequest),
    /// Dispatch without asking again
    Confirmed(Confirmed),
    Filter(ListFilter),
}

/// Result of routing one key to the active modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    Stay,
    Submit(Submission),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Setup,
    Help,
    TextInput,
    DependencyEditor,
    FilterWizard,
    PresetMenu,
    DestinationMenu,
    RemoteAttach,
    Confirm,
    Form,
    Detail,
    QueueBoard,
}

impl ModalKind {
    /// Higher wins when the system offers a modal over an active one
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Setup => 12,
            Self::Help => 11,
            Self::TextInput => 10,
            Self::DependencyEditor => 9,
            Self::FilterWizard => 8,
            Self::PresetMenu => 7,
            Self::DestinationMenu => 6,
            Self::RemoteAttach => 5,
            Self::Confirm => 4,
            Self::Form => 3,
            Self::Detail => 2,
            Self::QueueBoard => 1,
        }
    }

    /// Viewers only display, so closing one reads as "Closed"
    pub fn is_viewer(&self) -> bool {
        matches!(self, Self::Detail | Self::QueueBoard | Self::Help)
    }
}

/// Everything a modal may need to draw itself
pub struct ModalView<'a> {
    pub snapshot: &'a Snapshot,
    pub detail: Option<&'a DetailState>,
    pub theme: &'a Theme,
}

#[derive(Debug, Clone)]
pub enum Modal {
    Setup(SetupDialog),
    Confirm(ConfirmDialog),
    Form(SettingsForm),
    TextInput(TextInputDialog),
    DependencyEditor(DependencyEditor),
    FilterWizard(FilterWizard),
    PresetMenu(SelectMenu),
    DestinationMenu(SelectMenu),
    RemoteAttach(RemoteAttachDialog),
    Detail(DetailView),
    QueueBoard(QueueBoard),
    Help(HelpOverlay),
}

impl Modal {
    pub fn kind(&self) -> ModalKind {
        match self {
            Modal::Setup(_) => ModalKind::Setup,
            Modal::Confirm(_) => ModalKind::Confirm,
            Modal::Form(_) => ModalKind::Form,
            Modal::TextInput(_) => ModalKind::TextInput,
            Modal::DependencyEditor(_) => ModalKind::DependencyEditor,
            Modal::FilterWizard(_) => ModalKind::FilterWizard,
            Modal::PresetMenu(_) => ModalKind::PresetMenu,
            Modal::DestinationMenu(_) => ModalKind::DestinationMenu,
            Modal::RemoteAttach(_) => ModalKind::RemoteAttach,
            Modal::Detail(_) => ModalKind::Detail,
            Modal::QueueBoard(_) => ModalKind::QueueBoard,
            Modal::Help(_) => ModalKind::Help,
        }
    }

    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        snapshot: &Snapshot,
    ) -> ModalOutcome {
        match self {
            Modal::Setup(m) => m.handle_key(code, modifiers),
            Modal::Confirm(m) => m.handle_key(code),
            Modal::Form(m) => m.handle_key(code, modifiers),
            Modal::TextInput(m) => m.handle_key(code, modifiers),
            Modal::DependencyEditor(m) => m.handle_key(code, modifiers),
            Modal::FilterWizard(m) => m.handle_key(code),
            Modal::PresetMenu(m) | Modal::DestinationMenu(m) => m.handle_key(code),
            Modal::RemoteAttach(m) => m.handle_key(code, modifiers),
            Modal::Detail(m) => m.handle_key(code),
            Modal::QueueBoard(m) => m.handle_key(code, snapshot),
            Modal::Help(m) => m.handle_key(code),
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, view: &ModalView<'_>) {
        let theme = view.theme;
        match self {
            Modal::Setup(m) => m.render(f, area, theme),
            Modal::Confirm(m) => m.render(f, area, theme),
            Modal::Form(m) => m.render(f, area, theme),
            Modal::TextInput(m) => m.render(f, area, theme),
            Modal::DependencyEditor(m) => m.render(f, area, theme),
            Modal::FilterWizard(m) => m.render(f, area, theme),
            Modal::PresetMenu(m) | Modal::DestinationMenu(m) => m.render(f, area, theme),
            Modal::RemoteAttach(m) => m.render(f, area, theme),
            Modal::Detail(m) => m.render(f, area, view.detail, theme),
            Modal::QueueBoard(m) => m.render(f, area, view.snapshot, theme),
            Modal::Help(m) => m.render(f, area, theme),
        }
    }
}

/// The single modal slot
#[derive(Debug, Default)]
pub struct ModalStack {
    active: Option<Modal>,
}

impl ModalStack {
    pub fn active_mut(&mut self) -> Option<&mut Modal> {
        self.active.as_mut()
    }

    pub fn kind(&self) -> Option<ModalKind> {
        self.active.as_ref().map(Modal::kind)
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// User-initiated open: replaces the active modal
    pub fn open(&mut self, modal: Modal) {
        if let Some(previous) = &self.active {
            tracing::debug!(from = ?previous.kind(), to = ?modal.kind(), "Replacing modal");
        }
        self.active = Some(modal);
    }

    /// System-initiated open: only replaces a modal it outranks. Returns
    /// whether the modal is now active.
    pub fn offer(&mut self, modal: Modal) -> bool {
        let wins = self
            .kind()
            .map_or(true, |active| modal.kind().precedence() > active.precedence());
        if wins {
            self.open(modal);
        }
        wins
    }

    pub fn close(&mut self) -> Option<Modal> {
        self.active.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::Section;

    #[test]
    fn test_open_replaces_active() {
        let mut modals = ModalStack::default();
        modals.open(Modal::Help(HelpOverlay::new(Section::Workers)));
        modals.open(Modal::QueueBoard(QueueBoard::new()));
        assert_eq!(modals.kind(), Some(ModalKind::QueueBoard));
        modals.close();
        assert!(!modals.is_open());
    }

    #[test]
    fn test_offer_respects_precedence() {
        let mut modals = ModalStack::default();
        assert!(modals.offer(Modal::Help(HelpOverlay::new(Section::Workers))));
        assert!(modals.offer(Modal::Setup(SetupDialog::new("/srv"))));
        assert_eq!(modals.kind(), Some(ModalKind::Setup));
        assert!(!modals.offer(Modal::Help(HelpOverlay::new(Section::Workers))));
        assert_eq!(modals.kind(), Some(ModalKind::Setup));
    }

    #[test]
    fn test_precedence_is_a_total_order() {
        // Highest first
        let order = [
            ModalKind::Setup,
            ModalKind::Help,
            ModalKind::TextInput,
            ModalKind::DependencyEditor,
            ModalKind::FilterWizard,
            ModalKind::PresetMenu,
            ModalKind::DestinationMenu,
            ModalKind::RemoteAttach,
            ModalKind::Confirm,
            ModalKind::Form,
            ModalKind::Detail,
            ModalKind::QueueBoard,
        ];
        let ranks: Vec<u8> = order.iter().map(ModalKind::precedence).collect();
        assert!(ranks.windows(2).all(|w| w[0] > w[1]));
        assert!(order
            .iter()
            .skip(1)
            .all(|k| ModalKind::Setup.precedence() > k.precedence()));
        assert!(ModalKind::Confirm.precedence() > ModalKind::Form.precedence());
        assert!(ModalKind::Detail.precedence() > ModalKind::QueueBoard.precedence());
    }
}
