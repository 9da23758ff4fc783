//! Refresh scheduling and snapshot replacement

use foreman_core::{ActionKind, ActionTarget, Snapshot};

use crate::tui::components::Severity;
use crate::tui::modals::{Modal, ModalKind, SetupDialog};
use crate::tui::state::{ControlState, Effect};
use crate::tui::utils::RefreshOutcome;

impl ControlState {
    /// Periodic tick: start a refresh unless one is already running
    pub(crate) fn on_refresh_tick(&mut self) {
        match self.refresh.try_begin() {
            Some(seq) => self.push_effect(Effect::Refresh {
                seq,
                timeout: self.timeouts.refresh,
            }),
            None => tracing::trace!("Refresh in flight, skipping tick"),
        }
    }

    /// Out-of-band refresh, coalesced with any refresh already running
    pub(crate) fn request_refresh(&mut self) {
        match self.refresh.request() {
            Some(seq) => self.push_effect(Effect::Refresh {
                seq,
                timeout: self.timeouts.refresh,
            }),
            None => tracing::debug!("Refresh in flight, follow-up queued"),
        }
    }

    pub(crate) fn on_refreshed(&mut self, outcome: RefreshOutcome) {
        if !self.refresh.finish(outcome.seq, self.clock) {
            tracing::debug!(seq = outcome.seq, "Discarding stale refresh result");
            return;
        }

        match outcome.result {
            Ok(snapshot) => self.apply_snapshot(snapshot),
            Err(message) => {
                // Keep showing the last good snapshot
                tracing::warn!("Refresh failed: {}", message);
                self.refresh.connected = false;
                self.refresh.error_count = 1;
            }
        }

        if self.refresh.take_follow_up() {
            self.request_refresh();
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        for error in &snapshot.errors {
            tracing::debug!(section = %error.section, "Sub-collection failed: {}", error.message);
        }
        self.refresh.connected = true;
        self.refresh.error_count = snapshot.error_count();
        let initialized = snapshot.initialized;
        self.snapshot = snapshot;
        self.sync_selection();

        if !initialized {
            self.offer_setup();
        } else if self.modals.kind() == Some(ModalKind::Setup) {
            self.modals.close();
            self.notify("Workspace ready", Severity::Success);
        }
    }

    fn offer_setup(&mut self) {
        let initializing = self
            .pending
            .is_in_flight(ActionKind::Initialize, &ActionTarget::Global);
        if initializing || self.modals.kind() == Some(ModalKind::Setup) {
            return;
        }
        if self
            .modals
            .offer(Modal::Setup(SetupDialog::new(&self.workspace_hint)))
        {
            tracing::info!("No workspace found, opening setup");
        }
    }
}
