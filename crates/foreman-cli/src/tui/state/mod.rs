//! Control state
//!
//! [`ControlState`] owns everything the control loop mutates: the current
//! snapshot, the modal slot, selection, refresh bookkeeping, the status line,
//! the detail cache, and the pending-action table. It never performs I/O.
//! Handlers return [`Effect`]s and the runtime turns them into background
//! tasks whose completions come back as events.

mod cascade;
mod pending;
mod refresh;
mod selection;

pub use cascade::{DetailCache, DetailState};
pub use pending::{ActionId, PendingAction, PendingActions};
pub use refresh::RefreshState;
pub use selection::{visible_entities, Entity, EntityKey, FilterField, ListFilter, Section, Selection};

use std::time::{Duration, Instant};

use foreman_core::snapshot::DetailRequest;
use foreman_core::{Snapshot, StatusDurations, Timeouts};

use crate::tui::components::{Severity, StatusLine};
use crate::tui::modals::ModalStack;

/// Work for the runtime to start on the state machine's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Refresh { seq: u64, timeout: Duration },
    Execute(PendingAction),
    LoadDetail {
        key: EntityKey,
        request: DetailRequest,
        timeout: Duration,
    },
}

pub struct ControlState {
    pub snapshot: Snapshot,
    pub modals: ModalStack,
    pub selection: Selection,
    pub filter: Option<ListFilter>,
    pub refresh: RefreshState,
    pub status: StatusLine,
    pub detail: DetailCache,
    pub pending: PendingActions,
    pub should_quit: bool,
    pub(crate) timeouts: Timeouts,
    durations: StatusDurations,
    /// Prefill for the setup dialog
    pub(crate) workspace_hint: String,
    /// Time of the event being handled
    pub(crate) clock: Instant,
    effects: Vec<Effect>,
}

impl ControlState {
    pub fn new(
        timeouts: Timeouts,
        durations: StatusDurations,
        workspace_hint: impl Into<String>,
        now: Instant,
    ) -> Self {
        Self {
            snapshot: Snapshot::default(),
            modals: ModalStack::default(),
            selection: Selection::default(),
            filter: None,
            refresh: RefreshState::new(),
            status: StatusLine::new(),
            detail: DetailCache::default(),
            pending: PendingActions::default(),
            should_quit: false,
            timeouts,
            durations,
            workspace_hint: workspace_hint.into(),
            clock: now,
            effects: Vec::new(),
        }
    }

    /// Rows of the active section after filtering
    pub fn entities(&self) -> Vec<Entity<'_>> {
        visible_entities(&self.snapshot, self.selection.section(), self.filter.as_ref())
    }

    pub fn selected_entity(&self) -> Option<Entity<'_>> {
        self.entities().get(self.selection.index()).copied()
    }

    pub fn selected_key(&self) -> Option<&EntityKey> {
        self.selection.key()
    }

    /// Set the status line; errors stay up longer
    pub(crate) fn notify(&mut self, text: impl Into<String>, severity: Severity) {
        let duration = match severity {
            Severity::Error => self.durations.error,
            _ => self.durations.normal,
        };
        self.status.set(text, severity, duration, self.clock);
    }

    pub(crate) fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub(crate) fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}
