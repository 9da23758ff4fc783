//! Effect runtime
//!
//! Turns [`Effect`]s from the control state into background tasks. Every task
//! runs under a deadline and posts exactly one completion event, except a
//! drill-down load that was superseded, which is aborted and posts nothing.
//! Reads are aborted when their deadline passes; actions are left running.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::AbortHandle;

use foreman_core::snapshot::DetailRequest;
use foreman_core::{CommandExecutor, SnapshotSource};

use crate::tui::state::{Effect, EntityKey, PendingAction};
use crate::tui::utils::{
    ActionFailure, ActionOutcome, ControlEvent, DetailOutcome, EventSender, RefreshOutcome,
};

/// Why a bounded task produced no value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoundedError {
    #[error("no response after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("task panicked: {0}")]
    Panicked(String),
}

/// What happens to the work once its deadline passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnTimeout {
    /// Drop the work, killing any child process it owns
    Abort,
    /// Stop waiting but let the work run to completion
    Detach,
}

pub struct Runtime {
    source: Arc<dyn SnapshotSource>,
    executor: Arc<dyn CommandExecutor>,
    events: EventSender,
    /// The one drill-down load allowed to be running
    detail_task: Option<AbortHandle>,
}

impl Runtime {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        executor: Arc<dyn CommandExecutor>,
        events: EventSender,
    ) -> Self {
        Self {
            source,
            executor,
            events,
            detail_task: None,
        }
    }

    /// Start a task for each effect
    pub fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Refresh { seq, timeout } => self.spawn_refresh(seq, timeout),
                Effect::Execute(action) => self.spawn_action(action),
                Effect::LoadDetail {
                    key,
                    request,
                    timeout,
                } => self.spawn_detail(key, request, timeout),
            }
        }
    }

    fn spawn_refresh(&self, seq: u64, timeout: Duration) {
        tracing::debug!(seq, "Starting refresh");
        let source = self.source.clone();
        let events = self.events.clone();
        spawn_bounded(
            timeout,
            OnTimeout::Abort,
            async move { source.refresh().await },
            move |result| {
                let result = match result {
                    Ok(Ok(snapshot)) => Ok(snapshot),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                if let Err(e) = &result {
                    tracing::warn!(seq, error = %e, "Refresh failed");
                }
                let _ = events.send(ControlEvent::Refreshed(RefreshOutcome { seq, result }));
            },
        );
    }

    fn spawn_action(&self, action: PendingAction) {
        tracing::info!(id = %action.id, action = %action.kind, target = %action.target, "Dispatching");
        let executor = self.executor.clone();
        let events = self.events.clone();
        let PendingAction {
            id,
            kind,
            target,
            input,
            timeout,
            ..
        } = action;
        let work_target = target.clone();

        spawn_bounded(
            timeout,
            OnTimeout::Detach,
            async move { executor.execute(kind, &work_target, input.as_ref()).await },
            move |result| {
                let result = match result {
                    Ok(Ok(output)) => Ok(output),
                    Ok(Err(e)) => Err(ActionFailure {
                        message: e.message,
                        partial_output: e.partial_output,
                        timed_out: false,
                    }),
                    Err(e) => Err(ActionFailure {
                        timed_out: matches!(e, BoundedError::TimedOut(_)),
                        message: e.to_string(),
                        partial_output: String::new(),
                    }),
                };
                match &result {
                    Ok(_) => tracing::info!(%id, action = %kind, "Action succeeded"),
                    Err(f) => tracing::warn!(%id, action = %kind, error = %f.message, "Action failed"),
                }
                let _ = events.send(ControlEvent::ActionFinished(ActionOutcome {
                    id,
                    kind,
                    target,
                    result,
                }));
            },
        );
    }

    fn spawn_detail(&mut self, key: EntityKey, request: DetailRequest, timeout: Duration) {
        if let Some(previous) = self.detail_task.take() {
            previous.abort();
        }
        tracing::debug!(%key, "Loading detail");
        let source = self.source.clone();
        let events = self.events.clone();
        let handle = spawn_bounded(
            timeout,
            OnTimeout::Abort,
            async move { source.load_detail(&request).await },
            move |result| {
                let result = match result {
                    Ok(Ok(detail)) => Ok(detail),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                let _ = events.send(ControlEvent::DetailLoaded(DetailOutcome { key, result }));
            },
        );
        self.detail_task = Some(handle);
    }
}

/// Run `work` with a deadline and hand its result to `complete`.
///
/// Returns the abort handle of the work itself. Aborting it skips `complete`.
/// `on_timeout` decides whether work that missed its deadline is dropped or
/// left to finish unobserved.
pub fn spawn_bounded<T, F, C>(
    timeout: Duration,
    on_timeout: OnTimeout,
    work: F,
    complete: C,
) -> AbortHandle
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
    C: FnOnce(Result<T, BoundedError>) + Send + 'static,
{
    let task = tokio::spawn(work);
    let abort = task.abort_handle();
    let expired = abort.clone();
    tokio::spawn(async move {
        let result = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if e.is_cancelled() => return,
            Ok(Err(e)) => Err(BoundedError::Panicked(panic_message(e.into_panic()))),
            Err(_) => {
                if on_timeout == OnTimeout::Abort {
                    expired.abort();
                }
                Err(BoundedError::TimedOut(timeout))
            }
        };
        complete(result);
    });
    abort
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
