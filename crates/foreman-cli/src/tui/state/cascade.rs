//! Drill-down cache
//!
//! Holds detail for exactly one entity. A result is accepted only while its
//! key still matches the selection, so a slow load for an entity the user has
//! already moved past can never be shown.

use foreman_core::EntityDetail;

use super::EntityKey;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(EntityDetail),
    /// The load failed; shown in place of the detail, not on the status line
    Failed(String),
}

#[derive(Debug, Default)]
pub struct DetailCache {
    entry: Option<(EntityKey, DetailState)>,
}

impl DetailCache {
    pub fn key(&self) -> Option<&EntityKey> {
        self.entry.as_ref().map(|(key, _)| key)
    }

    /// Cached detail, only if it belongs to `current`
    pub fn get(&self, current: Option<&EntityKey>) -> Option<&DetailState> {
        match (&self.entry, current) {
            (Some((key, state)), Some(current)) if key == current => Some(state),
            _ => None,
        }
    }

    /// Forget the old entry and mark `key` as loading
    pub fn begin(&mut self, key: EntityKey) {
        self.entry = Some((key, DetailState::Loading));
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// Store a finished load. Returns false, storing nothing, when `key` is
    /// no longer the selected entity.
    pub fn complete(
        &mut self,
        key: &EntityKey,
        current: Option<&EntityKey>,
        state: DetailState,
    ) -> bool {
        if current != Some(key) || self.key() != Some(key) {
            return false;
        }
        self.entry = Some((key.clone(), state));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::Section;

    fn key(id: &str) -> EntityKey {
        EntityKey {
            section: Section::Workers,
            id: id.into(),
        }
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut cache = DetailCache::default();
        cache.begin(key("api/w1"));
        cache.begin(key("api/w2"));

        let late = DetailState::Loaded(EntityDetail::default());
        assert!(!cache.complete(&key("api/w1"), Some(&key("api/w2")), late));
        assert_eq!(cache.get(Some(&key("api/w2"))), Some(&DetailState::Loading));
    }

    #[test]
    fn test_detail_hidden_for_other_selection() {
        let mut cache = DetailCache::default();
        cache.begin(key("api/w1"));
        assert!(cache.complete(
            &key("api/w1"),
            Some(&key("api/w1")),
            DetailState::Failed("gone".into())
        ));
        assert!(cache.get(Some(&key("api/w2"))).is_none());
        assert!(cache.get(None).is_none());
        assert_eq!(
            cache.get(Some(&key("api/w1"))),
            Some(&DetailState::Failed("gone".into()))
        );
    }
}
