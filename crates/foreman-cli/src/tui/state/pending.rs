//! In-flight actions
//!
//! Each dispatched action gets a fresh [`ActionId`]. Completions are matched by
//! id and must agree on kind and target; anything else is discarded.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use foreman_core::{ActionInput, ActionKind, ActionRequest, ActionTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(u64);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A dispatched action awaiting its completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub id: ActionId,
    pub kind: ActionKind,
    pub target: ActionTarget,
    pub input: Option<ActionInput>,
    pub timeout: Duration,
    pub started_at: Instant,
}

#[derive(Debug, Default)]
pub struct PendingActions {
    next_id: u64,
    in_flight: HashMap<ActionId, PendingAction>,
}

impl PendingActions {
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Whether the same operation on the same target is already running
    pub fn is_in_flight(&self, kind: ActionKind, target: &ActionTarget) -> bool {
        self.in_flight
            .values()
            .any(|a| a.kind == kind && &a.target == target)
    }

    /// Record a new dispatch and return it
    pub fn start(&mut self, request: ActionRequest, timeout: Duration, now: Instant) -> PendingAction {
        self.next_id += 1;
        let action = PendingAction {
            id: ActionId(self.next_id),
            kind: request.kind,
            target: request.target,
            input: request.input,
            timeout,
            started_at: now,
        };
        self.in_flight.insert(action.id, action.clone());
        action
    }

    /// Remove and return the action a completion belongs to
    pub fn complete(
        &mut self,
        id: ActionId,
        kind: ActionKind,
        target: &ActionTarget,
    ) -> Option<PendingAction> {
        let matches = self
            .in_flight
            .get(&id)
            .is_some_and(|a| a.kind == kind && &a.target == target);
        if !matches {
            return None;
        }
        self.in_flight.remove(&id)
    }

    /// Oldest running action, for the status bar
    pub fn oldest(&self) -> Option<&PendingAction> {
        self.in_flight.values().min_by_key(|a| a.started_at)
    }
}
