//! Control events
//!
//! Everything the control loop reacts to arrives as a [`ControlEvent`]:
//! terminal keys, the refresh tick, and completions posted back by background
//! tasks over an unbounded channel. Completions carry all the data needed to
//! match them to the request that produced them.

use crossterm::event::KeyEvent;
use tokio::sync::mpsc;

use foreman_core::{ActionKind, ActionTarget, EntityDetail, Snapshot};

use crate::tui::state::{ActionId, EntityKey};

/// Result of one refresh request
#[derive(Debug)]
pub struct RefreshOutcome {
    pub seq: u64,
    pub result: Result<Snapshot, String>,
}

/// Why a dispatched action did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFailure {
    pub message: String,
    pub partial_output: String,
    /// The deadline passed before the executor answered
    pub timed_out: bool,
}

/// Result of one dispatched action
#[derive(Debug)]
pub struct ActionOutcome {
    pub id: ActionId,
    pub kind: ActionKind,
    pub target: ActionTarget,
    pub result: Result<String, ActionFailure>,
}

/// Result of one drill-down load
#[derive(Debug)]
pub struct DetailOutcome {
    pub key: EntityKey,
    pub result: Result<EntityDetail, String>,
}

/// Input to the control state machine
#[derive(Debug)]
pub enum ControlEvent {
    Key(KeyEvent),
    /// Periodic refresh tick
    RefreshTick,
    Refreshed(RefreshOutcome),
    ActionFinished(ActionOutcome),
    DetailLoaded(DetailOutcome),
}

pub type EventSender = mpsc::UnboundedSender<ControlEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<ControlEvent>;

/// Create the completion channel
pub fn control_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
