//! Control event entry point

use std::time::Instant;

use crate::tui::state::{ControlState, Effect};
use crate::tui::utils::ControlEvent;

impl ControlState {
    /// Apply one event at time `now` and return the work it started
    pub fn handle_event(&mut self, event: ControlEvent, now: Instant) -> Vec<Effect> {
        self.clock = now;
        match event {
            ControlEvent::Key(key) => self.handle_key(key),
            ControlEvent::RefreshTick => self.on_refresh_tick(),
            ControlEvent::Refreshed(outcome) => self.on_refreshed(outcome),
            ControlEvent::ActionFinished(outcome) => self.on_action_finished(outcome),
            ControlEvent::DetailLoaded(outcome) => self.on_detail_loaded(outcome),
        }
        self.status.tick(now);
        self.take_effects()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use foreman_core::snapshot::{Project, Worker, WorkerState};
    use foreman_core::{
        ActionKind, ActionTarget, EntityDetail, Snapshot, StatusDurations, Timeouts,
    };

    use super::*;
    use crate::tui::components::Severity;
    use crate::tui::modals::ModalKind;
    use crate::tui::state::{DetailState, EntityKey, PendingAction, Section};
    use crate::tui::utils::{ActionFailure, ActionOutcome, DetailOutcome, RefreshOutcome};

    fn key(code: KeyCode) -> ControlEvent {
        ControlEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn worker(name: &str) -> Worker {
        Worker {
            project: "api".into(),
            name: name.into(),
            state: WorkerState::Working,
            ..Worker::default()
        }
    }

    fn fleet(workers: &[&str]) -> Snapshot {
        Snapshot {
            initialized: true,
            projects: vec![Project {
                name: "api".into(),
                ..Project::default()
            }],
            workers: workers.iter().map(|w| worker(w)).collect(),
            ..Snapshot::default()
        }
    }

    struct Harness {
        state: ControlState,
        now: Instant,
    }

    impl Harness {
        fn new() -> Self {
            let now = Instant::now();
            Self {
                state: ControlState::new(
                    Timeouts::default(),
                    StatusDurations::default(),
                    "/srv/fleet",
                    now,
                ),
                now,
            }
        }

        /// A harness whose first refresh delivered `snapshot`
        fn with_snapshot(snapshot: Snapshot) -> Self {
            let mut h = Self::new();
            let effects = h.send(ControlEvent::RefreshTick);
            let Effect::Refresh { seq, .. } = effects[0] else {
                panic!("expected a refresh, got {effects:?}");
            };
            h.send(ControlEvent::Refreshed(RefreshOutcome {
                seq,
                result: Ok(snapshot),
            }));
            h
        }

        fn send(&mut self, event: ControlEvent) -> Vec<Effect> {
            self.state.handle_event(event, self.now)
        }

        fn advance(&mut self, by: Duration) {
            self.now += by;
        }

        fn status(&self) -> Option<(String, Severity)> {
            self.state
                .status
                .visible(self.now)
                .map(|m| (m.text.clone(), m.severity))
        }
    }

    fn executed(effects: &[Effect]) -> Vec<&PendingAction> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Execute(action) => Some(action),
                _ => None,
            })
            .collect()
    }

    fn refreshes(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, Effect::Refresh { .. }))
            .count()
    }

    #[test]
    fn test_tick_starts_single_refresh() {
        let mut h = Harness::new();
        let first = h.send(ControlEvent::RefreshTick);
        assert_eq!(refreshes(&first), 1);
        assert!(h.state.refresh.is_refreshing());

        let second = h.send(ControlEvent::RefreshTick);
        assert_eq!(refreshes(&second), 0);
        assert!(h.state.refresh.is_refreshing());
    }

    #[test]
    fn test_refresh_completion_replaces_snapshot() {
        let h = Harness::with_snapshot(fleet(&["w1", "w2"]));
        assert!(!h.state.refresh.is_refreshing());
        assert!(h.state.refresh.connected);
        assert_eq!(h.state.refresh.error_count, 0);
        assert_eq!(h.state.refresh.last_refresh, Some(h.now));
        assert_eq!(h.state.snapshot.workers.len(), 2);
        assert_eq!(h.state.selected_key().unwrap().id, "api/w1");
    }

    #[test]
    fn test_primary_failure_keeps_last_snapshot() {
        let mut h = Harness::with_snapshot(fleet(&["w1"]));
        let Effect::Refresh { seq, .. } = h.send(ControlEvent::RefreshTick)[0] else {
            panic!("expected a refresh");
        };
        h.send(ControlEvent::Refreshed(RefreshOutcome {
            seq,
            result: Err("connection refused".into()),
        }));

        assert_eq!(h.state.snapshot.workers.len(), 1);
        assert!(!h.state.refresh.connected);
        assert_eq!(h.state.refresh.error_count, 1);
        assert!(!h.state.refresh.is_refreshing());
    }

    #[test]
    fn test_cancelled_confirmation_never_executes() {
        let mut h = Harness::with_snapshot(fleet(&["w1"]));
        let effects = h.send(key(KeyCode::Char('X')));
        assert!(executed(&effects).is_empty());
        assert_eq!(h.state.modals.kind(), Some(ModalKind::Confirm));

        let effects = h.send(key(KeyCode::Esc));
        assert!(executed(&effects).is_empty());
        assert!(!h.state.modals.is_open());
        assert!(h.state.pending.is_empty());
        assert_eq!(h.status(), Some(("Cancelled".to_string(), Severity::Info)));
    }

    #[test]
    fn test_confirmed_destructive_action_executes_once() {
        let mut h = Harness::with_snapshot(fleet(&["w1"]));
        h.send(key(KeyCode::Char('x')));
        let effects = h.send(key(KeyCode::Char('y')));
        let actions = executed(&effects);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::StopWorker);
        assert_eq!(actions[0].timeout, Duration::from_secs(30));

        // Same action on the same target while the first is running
        h.send(key(KeyCode::Char('x')));
        let effects = h.send(key(KeyCode::Char('y')));
        assert!(executed(&effects).is_empty());
        assert_eq!(h.status().unwrap().1, Severity::Warning);
    }

    #[test]
    fn test_non_destructive_action_skips_confirmation() {
        let mut h = Harness::with_snapshot(fleet(&["w1"]));
        let effects = h.send(key(KeyCode::Char('R')));
        assert_eq!(executed(&effects).len(), 1);
        assert!(!h.state.modals.is_open());
    }

    #[test]
    fn test_timed_out_action_reports_failure_without_retry() {
        let mut h = Harness::with_snapshot(fleet(&["w1"]));
        let effects = h.send(key(KeyCode::Char('R')));
        let action = executed(&effects)[0].clone();

        h.advance(action.timeout);
        let effects = h.send(ControlEvent::ActionFinished(ActionOutcome {
            id: action.id,
            kind: action.kind,
            target: action.target.clone(),
            result: Err(ActionFailure {
                message: "no response after 30s".into(),
                partial_output: String::new(),
                timed_out: true,
            }),
        }));

        assert!(effects.is_empty());
        assert!(h.state.pending.is_empty());
        let (text, severity) = h.status().unwrap();
        assert_eq!(severity, Severity::Error);
        assert!(text.contains("timed out"));
    }

    #[test]
    fn test_success_requests_refresh() {
        let mut h = Harness::with_snapshot(fleet(&["w1"]));
        let effects = h.send(key(KeyCode::Char('R')));
        let action = executed(&effects)[0].clone();

        let effects = h.send(ControlEvent::ActionFinished(ActionOutcome {
            id: action.id,
            kind: action.kind,
            target: action.target,
            result: Ok(String::new()),
        }));
        assert_eq!(refreshes(&effects), 1);
        assert_eq!(h.status().unwrap().1, Severity::Success);
    }

    #[test]
    fn test_unmatched_completion_is_discarded() {
        let mut h = Harness::with_snapshot(fleet(&["w1"]));
        let effects = h.send(key(KeyCode::Char('R')));
        let action = executed(&effects)[0].clone();

        let effects = h.send(ControlEvent::ActionFinished(ActionOutcome {
            id: action.id,
            kind: ActionKind::NukeWorker,
            target: action.target,
            result: Ok(String::new()),
        }));
        assert!(effects.is_empty());
        assert_eq!(h.state.pending.len(), 1);
    }

    #[test]
    fn test_only_latest_detail_is_applied() {
        let mut h = Harness::with_snapshot(fleet(&["w0", "w1", "w2"]));
        h.send(key(KeyCode::Char('j')));
        h.send(key(KeyCode::Char('j')));
        assert_eq!(h.state.selected_key().unwrap().id, "api/w2");

        let detail = |id: &str| {
            ControlEvent::DetailLoaded(DetailOutcome {
                key: EntityKey {
                    section: Section::Workers,
                    id: id.into(),
                },
                result: Ok(EntityDetail {
                    title: id.into(),
                    ..EntityDetail::default()
                }),
            })
        };
        // Loads return out of order
        h.send(detail("api/w1"));
        h.send(detail("api/w0"));
        assert_eq!(
            h.state.detail.get(h.state.selected_key()),
            Some(&DetailState::Loading)
        );

        h.send(detail("api/w2"));
        match h.state.detail.get(h.state.selected_key()) {
            Some(DetailState::Loaded(d)) => assert_eq!(d.title, "api/w2"),
            other => panic!("unexpected cache state: {other:?}"),
        }
    }

    #[test]
    fn test_each_selection_change_starts_a_load() {
        let mut h = Harness::with_snapshot(fleet(&["w0", "w1"]));
        let effects = h.send(key(KeyCode::Char('j')));
        assert!(matches!(
            &effects[..],
            [Effect::LoadDetail { key, .. }] if key.id == "api/w1"
        ));
        // Already at the end: no change, no load
        assert!(h.send(key(KeyCode::Char('j'))).is_empty());
    }

    #[test]
    fn test_uninitialized_snapshot_opens_setup() {
        let mut h = Harness::with_snapshot(Snapshot::uninitialized());
        assert_eq!(h.state.modals.kind(), Some(ModalKind::Setup));

        // Esc does not leave setup
        h.send(key(KeyCode::Esc));
        assert_eq!(h.state.modals.kind(), Some(ModalKind::Setup));

        let effects = h.send(key(KeyCode::Enter));
        let actions = executed(&effects);
        assert_eq!(actions[0].kind, ActionKind::Initialize);
        assert_eq!(actions[0].target, ActionTarget::Global);
        assert!(!h.state.modals.is_open());
    }

    #[test]
    fn test_setup_outranks_open_help() {
        let mut h = Harness::new();
        h.send(key(KeyCode::Char('?')));
        assert_eq!(h.state.modals.kind(), Some(ModalKind::Help));

        let Effect::Refresh { seq, .. } = h.send(ControlEvent::RefreshTick)[0] else {
            panic!("expected a refresh");
        };
        h.send(ControlEvent::Refreshed(RefreshOutcome {
            seq,
            result: Ok(Snapshot::uninitialized()),
        }));
        assert_eq!(h.state.modals.kind(), Some(ModalKind::Setup));
    }

    #[test]
    fn test_global_settings_edit_requires_confirmation() {
        let mut h = Harness::with_snapshot(fleet(&["w1"]));
        h.send(key(KeyCode::Char(',')));
        assert_eq!(h.state.modals.kind(), Some(ModalKind::Form));
        // Toggle notifications (last field) and save
        h.send(key(KeyCode::Up));
        h.send(key(KeyCode::Char(' ')));
        let effects = h.send(key(KeyCode::Enter));
        assert!(executed(&effects).is_empty());
        assert_eq!(h.state.modals.kind(), Some(ModalKind::Confirm));

        let effects = h.send(key(KeyCode::Char('y')));
        assert_eq!(executed(&effects)[0].kind, ActionKind::UpdateGlobalSettings);
    }

    #[test]
    fn test_status_message_expires() {
        let mut h = Harness::with_snapshot(fleet(&["w1"]));
        h.send(key(KeyCode::Char('X')));
        h.send(key(KeyCode::Esc));
        assert!(h.status().is_some());

        h.advance(Duration::from_secs(5));
        h.send(ControlEvent::RefreshTick);
        assert!(h.status().is_none());
    }

    #[test]
    fn test_esc_dismisses_status_immediately() {
        let mut h = Harness::with_snapshot(fleet(&["w1"]));
        h.send(key(KeyCode::Char('r')));
        assert!(h.status().is_some());

        h.send(key(KeyCode::Esc));
        assert!(h.status().is_none());
        assert!(h.state.status.visible(h.now).is_none());
    }

    #[test]
    fn test_closing_a_viewer_sets_neutral_status() {
        let mut h = Harness::with_snapshot(fleet(&["w1"]));
        h.send(key(KeyCode::Char('?')));
        assert_eq!(h.state.modals.kind(), Some(ModalKind::Help));

        h.send(key(KeyCode::Esc));
        assert!(!h.state.modals.is_open());
        assert_eq!(h.status(), Some(("Closed".to_string(), Severity::Info)));
    }

    #[test]
    fn test_filter_and_clear() {
        let mut snapshot = fleet(&["w1", "w2"]);
        snapshot.workers[1].project = "web".into();
        let mut h = Harness::with_snapshot(snapshot);

        // Field: project, value: api, confirm
        h.send(key(KeyCode::Char('/')));
        h.send(key(KeyCode::Enter));
        h.send(key(KeyCode::Enter));
        h.send(key(KeyCode::Enter));
        assert!(!h.state.modals.is_open());
        assert_eq!(h.state.entities().len(), 1);

        h.send(key(KeyCode::Esc));
        assert!(h.state.filter.is_none());
        assert_eq!(h.state.entities().len(), 2);
    }

    #[test]
    fn test_ctrl_c_quits_from_modal() {
        let mut h = Harness::with_snapshot(Snapshot::uninitialized());
        h.send(ControlEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(h.state.should_quit);
    }
}
