//! Action dispatch and completion
//!
//! Actions that need confirmation are parked in a confirm dialog and only
//! launched from [`Confirmed`]. Everything else launches immediately.

use foreman_core::{classify_error, ActionKind, ActionRequest, ErrorCategory};

use crate::tui::components::Severity;
use crate::tui::modals::{ConfirmDialog, Confirmed, Modal};
use crate::tui::state::{ControlState, Effect};
use crate::tui::utils::ActionOutcome;

impl ControlState {
    pub(crate) fn request_action(&mut self, request: ActionRequest) {
        if request.kind.requires_confirmation() {
            tracing::debug!(action = %request.describe(), "Awaiting confirmation");
            self.modals.open(Modal::Confirm(ConfirmDialog::new(request)));
            return;
        }
        self.launch(request);
    }

    pub(crate) fn dispatch_confirmed(&mut self, confirmed: Confirmed) {
        self.launch(confirmed.into_request());
    }

    fn launch(&mut self, request: ActionRequest) {
        let description = request.describe();
        if self.pending.is_in_flight(request.kind, &request.target) {
            self.notify(
                format!("{description} is already in progress"),
                Severity::Warning,
            );
            return;
        }

        let timeout = request.kind.timeout(&self.timeouts);
        let action = self.pending.start(request, timeout, self.clock);
        tracing::info!(id = %action.id, timeout = ?timeout, "Dispatching {}", description);
        self.notify(format!("{description}…"), Severity::Info);
        self.push_effect(Effect::Execute(action));
    }

    pub(crate) fn on_action_finished(&mut self, outcome: ActionOutcome) {
        let Some(action) = self
            .pending
            .complete(outcome.id, outcome.kind, &outcome.target)
        else {
            tracing::debug!(id = %outcome.id, "Discarding unmatched action completion");
            return;
        };
        let description = format!("{} {}", action.kind.label(), action.target);
        let elapsed = self.clock.saturating_duration_since(action.started_at);

        match outcome.result {
            Ok(output) => {
                tracing::info!(id = %action.id, elapsed = ?elapsed, "{} succeeded", description);
                let summary = output.lines().map(str::trim).find(|l| !l.is_empty());
                let text = match (action.kind, summary) {
                    (ActionKind::AttachWorker, Some(line)) => format!("{description}: {line}"),
                    _ => format!("{description} succeeded"),
                };
                self.notify(text, Severity::Success);
                self.request_refresh();
            }
            Err(failure) => {
                let category = if failure.timed_out {
                    ErrorCategory::Timeout
                } else {
                    classify_error(&failure.message)
                };
                tracing::warn!(
                    id = %action.id,
                    category = category.label(),
                    "{} failed: {}",
                    description,
                    failure.message
                );
                if !failure.partial_output.is_empty() {
                    tracing::debug!("Partial output: {}", failure.partial_output);
                }
                self.notify(
                    format!(
                        "{description} {}: {} ({})",
                        category.label(),
                        failure.message,
                        category.hint()
                    ),
                    Severity::Error,
                );
            }
        }
    }
}
