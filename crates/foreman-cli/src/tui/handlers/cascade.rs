//! Selection changes and the detail loads they trigger

use crate::tui::modals::{DetailView, Modal};
use crate::tui::state::{
    visible_entities, ControlState, DetailState, Effect, ListFilter, Section,
};
use crate::tui::utils::DetailOutcome;

impl ControlState {
    /// Re-anchor the cursor after the list changed, then reconcile the cache
    pub(crate) fn sync_selection(&mut self) {
        let entities = visible_entities(
            &self.snapshot,
            self.selection.section(),
            self.filter.as_ref(),
        );
        self.selection.resolve(&entities);
        self.sync_detail();
    }

    /// Start a load when the selected entity differs from the cached one
    fn sync_detail(&mut self) {
        let current = self
            .selected_entity()
            .map(|e| (e.key(), e.detail_request()));
        match current {
            Some((key, request)) if self.detail.key() != Some(&key) => {
                tracing::debug!(key = %key, "Loading detail");
                self.detail.begin(key.clone());
                self.push_effect(Effect::LoadDetail {
                    key,
                    request,
                    timeout: self.timeouts.detail,
                });
            }
            Some(_) => {}
            None => self.detail.clear(),
        }
    }

    pub(crate) fn move_cursor(&mut self, delta: isize) {
        let entities = visible_entities(
            &self.snapshot,
            self.selection.section(),
            self.filter.as_ref(),
        );
        self.selection.move_by(delta, &entities);
        self.sync_detail();
    }

    pub(crate) fn switch_section(&mut self, section: Section) {
        self.selection.set_section(section);
        self.sync_selection();
    }

    pub(crate) fn set_filter(&mut self, filter: Option<ListFilter>) {
        self.filter = filter;
        self.sync_selection();
    }

    /// Open the drill-down view, retrying a load that failed earlier
    pub(crate) fn open_detail(&mut self) {
        let Some(key) = self.selected_key().cloned() else {
            return;
        };
        if matches!(self.detail.get(Some(&key)), Some(DetailState::Failed(_))) {
            self.detail.clear();
            self.sync_detail();
        }
        self.modals.open(Modal::Detail(DetailView::new(key)));
    }

    pub(crate) fn on_detail_loaded(&mut self, outcome: DetailOutcome) {
        let state = match outcome.result {
            Ok(detail) => DetailState::Loaded(detail),
            Err(message) => {
                tracing::debug!(key = %outcome.key, "Detail load failed: {}", message);
                DetailState::Failed(message)
            }
        };
        let current = self.selection.key().cloned();
        if !self.detail.complete(&outcome.key, current.as_ref(), state) {
            tracing::debug!(key = %outcome.key, "Discarding superseded detail");
        }
    }
}
