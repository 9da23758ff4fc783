//! Routing keys to the active modal and acting on its outcome

use crossterm::event::{KeyCode, KeyModifiers};

use crate::tui::components::Severity;
use crate::tui::modals::{ModalOutcome, Submission};
use crate::tui::state::ControlState;

impl ControlState {
    /// Handle keyboard events while a modal is open
    pub(crate) fn handle_modal_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let snapshot = &self.snapshot;
        let Some(modal) = self.modals.active_mut() else {
            return;
        };

        match modal.handle_key(code, modifiers, snapshot) {
            ModalOutcome::Stay => {}
            ModalOutcome::Cancel => {
                if let Some(closed) = self.modals.close() {
                    let text = if closed.kind().is_viewer() { "Closed" } else { "Cancelled" };
                    self.notify(text, Severity::Info);
                }
            }
            ModalOutcome::Submit(submission) => {
                self.modals.close();
                self.apply_submission(submission);
            }
        }
    }

    fn apply_submission(&mut self, submission: Submission) {
        match submission {
            Submission::Action(request) => self.request_action(request),
            Submission::Confirmed(confirmed) => self.dispatch_confirmed(confirmed),
            Submission::Filter(filter) => {
                self.notify(format!("Filter: {filter}"), Severity::Info);
                self.set_filter(Some(filter));
            }
        }
    }
}
