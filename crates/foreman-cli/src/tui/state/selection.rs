//! Sections, entity identity, and the cursor
//!
//! The cursor remembers both a position and the identity of the entity under
//! it. After a snapshot is replaced the identity wins; the position is only a
//! fallback when the entity is gone.

use std::collections::BTreeSet;
use std::fmt;

use foreman_core::snapshot::{DetailRequest, Manager, Project, QueueEntry, WorkItem, Worker};
use foreman_core::{ActionTarget, Snapshot};

/// Top-level list shown in the main view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Projects,
    Workers,
    Managers,
    Queue,
    Work,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Self::Projects,
        Self::Workers,
        Self::Managers,
        Self::Queue,
        Self::Work,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Projects => "Projects",
            Self::Workers => "Workers",
            Self::Managers => "Managers",
            Self::Queue => "Merge Queue",
            Self::Work => "Work",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Projects => 0,
            Self::Workers => 1,
            Self::Managers => 2,
            Self::Queue => 3,
            Self::Work => 4,
        }
    }

    pub fn next(&self) -> Section {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Section {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Whether a state filter means anything for this section
    pub fn has_state(&self) -> bool {
        !matches!(self, Self::Projects)
    }
}

/// Stable identity of one listed entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub section: Section,
    pub id: String,
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.section.title(), self.id)
    }
}

/// Borrowed view of one row in a section
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Project(&'a Project),
    Worker(&'a Worker),
    Manager(&'a Manager),
    Queue(&'a QueueEntry),
    Work(&'a WorkItem),
}

impl<'a> Entity<'a> {
    pub fn section(&self) -> Section {
        match self {
            Self::Project(_) => Section::Projects,
            Self::Worker(_) => Section::Workers,
            Self::Manager(_) => Section::Managers,
            Self::Queue(_) => Section::Queue,
            Self::Work(_) => Section::Work,
        }
    }

    /// Action target addressing this entity
    pub fn target(&self) -> ActionTarget {
        match self {
            Self::Project(p) => ActionTarget::Project(p.name.clone()),
            Self::Worker(w) => ActionTarget::Worker {
                project: w.project.clone(),
                name: w.name.clone(),
            },
            Self::Manager(m) => ActionTarget::Manager {
                project: m.project.clone(),
                role: m.role,
            },
            Self::Queue(q) => ActionTarget::QueueEntry {
                project: q.project.clone(),
                id: q.id.clone(),
            },
            Self::Work(w) => ActionTarget::WorkItem(w.id.clone()),
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey {
            section: self.section(),
            id: self.target().to_string(),
        }
    }

    pub fn detail_request(&self) -> DetailRequest {
        match self {
            Self::Project(p) => DetailRequest::Project(p.name.clone()),
            Self::Worker(w) => DetailRequest::Worker {
                project: w.project.clone(),
                name: w.name.clone(),
            },
            Self::Manager(m) => DetailRequest::Manager {
                project: m.project.clone(),
                role: m.role,
            },
            Self::Queue(q) => DetailRequest::QueueEntry {
                project: q.project.clone(),
                id: q.id.clone(),
            },
            Self::Work(w) => DetailRequest::WorkItem(w.id.clone()),
        }
    }

    /// Owning project, if the entity belongs to one
    pub fn project(&self) -> Option<&'a str> {
        match self {
            Self::Project(p) => Some(&p.name),
            Self::Worker(w) => Some(&w.project),
            Self::Manager(m) => Some(&m.project),
            Self::Queue(q) => Some(&q.project),
            Self::Work(w) => w.project.as_deref(),
        }
    }

    /// State shown in the list and matched by state filters
    pub fn state_label(&self) -> Option<String> {
        match self {
            Self::Project(_) => None,
            Self::Worker(w) => Some(w.state.to_string()),
            Self::Manager(m) => Some(if m.running { "running" } else { "stopped" }.to_string()),
            Self::Queue(q) => Some(q.state.to_string()),
            Self::Work(w) => Some(w.status.clone()),
        }
    }
}

/// Rows of `section`, narrowed by `filter`
pub fn visible_entities<'a>(
    snapshot: &'a Snapshot,
    section: Section,
    filter: Option<&ListFilter>,
) -> Vec<Entity<'a>> {
    let all: Vec<Entity<'a>> = match section {
        Section::Projects => snapshot.projects.iter().map(Entity::Project).collect(),
        Section::Workers => snapshot.workers.iter().map(Entity::Worker).collect(),
        Section::Managers => snapshot.managers.iter().map(Entity::Manager).collect(),
        Section::Queue => snapshot.merge_queue.iter().map(Entity::Queue).collect(),
        Section::Work => snapshot.work_items.iter().map(Entity::Work).collect(),
    };
    match filter {
        Some(filter) => all.into_iter().filter(|e| filter.matches(e)).collect(),
        None => all,
    }
}

/// What a list filter compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Project,
    State,
}

impl FilterField {
    pub const ALL: [FilterField; 2] = [Self::Project, Self::State];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::State => "state",
        }
    }

    /// Distinct values this field takes in `section`, sorted
    pub fn candidates(&self, snapshot: &Snapshot, section: Section) -> Vec<String> {
        let values: BTreeSet<String> = visible_entities(snapshot, section, None)
            .iter()
            .filter_map(|e| match self {
                Self::Project => e.project().map(str::to_string),
                Self::State => e.state_label(),
            })
            .collect();
        values.into_iter().collect()
    }
}

/// Narrows every section to rows whose field equals a value. A state filter
/// does not apply to sections without a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub field: FilterField,
    pub value: String,
}

impl ListFilter {
    pub fn matches(&self, entity: &Entity<'_>) -> bool {
        match self.field {
            FilterField::Project => entity.project() == Some(self.value.as_str()),
            FilterField::State => {
                !entity.section().has_state()
                    || entity.state_label().as_deref() == Some(self.value.as_str())
            }
        }
    }
}

impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field.label(), self.value)
    }
}

#[derive(Debug, Clone, Default)]
struct Cursor {
    index: usize,
    key: Option<EntityKey>,
}

/// Active section plus one cursor per section
#[derive(Debug, Clone)]
pub struct Selection {
    section: Section,
    cursors: [Cursor; 5],
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            section: Section::Workers,
            cursors: Default::default(),
        }
    }
}

impl Selection {
    pub fn section(&self) -> Section {
        self.section
    }

    pub fn set_section(&mut self, section: Section) {
        self.section = section;
    }

    pub fn index(&self) -> usize {
        self.cursor().index
    }

    /// Identity of the entity under the cursor
    pub fn key(&self) -> Option<&EntityKey> {
        self.cursor().key.as_ref()
    }

    /// Move the cursor by `delta` rows, clamped to the list
    pub fn move_by(&mut self, delta: isize, entities: &[Entity<'_>]) {
        let cursor = self.cursor_mut();
        if entities.is_empty() {
            *cursor = Cursor::default();
            return;
        }
        let last = entities.len() - 1;
        cursor.index = cursor.index.saturating_add_signed(delta).min(last);
        cursor.key = Some(entities[cursor.index].key());
    }

    /// Re-anchor the cursor after the list changed. The remembered entity is
    /// found by identity; if it is gone the position is clamped instead.
    pub fn resolve(&mut self, entities: &[Entity<'_>]) {
        let cursor = self.cursor_mut();
        if entities.is_empty() {
            *cursor = Cursor::default();
            return;
        }
        if let Some(key) = &cursor.key {
            if let Some(found) = entities.iter().position(|e| &e.key() == key) {
                cursor.index = found;
                return;
            }
        }
        cursor.index = cursor.index.min(entities.len() - 1);
        cursor.key = Some(entities[cursor.index].key());
    }

    fn cursor(&self) -> &Cursor {
        &self.cursors[self.section.index()]
    }

    fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursors[self.section.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foreman_core::snapshot::WorkerState;

    fn worker(project: &str, name: &str, state: WorkerState) -> Worker {
        Worker {
            project: project.into(),
            name: name.into(),
            state,
            ..Worker::default()
        }
    }

    fn snapshot(workers: Vec<Worker>) -> Snapshot {
        Snapshot {
            initialized: true,
            workers,
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_section_cycle() {
        assert_eq!(Section::Work.next(), Section::Projects);
        assert_eq!(Section::Projects.prev(), Section::Work);
        assert_eq!(Section::Workers.next(), Section::Managers);
    }

    #[test]
    fn test_cursor_follows_identity_across_snapshots() {
        let before = snapshot(vec![
            worker("api", "w1", WorkerState::Idle),
            worker("api", "w2", WorkerState::Working),
        ]);
        let mut selection = Selection::default();
        selection.move_by(1, &visible_entities(&before, Section::Workers, None));
        assert_eq!(selection.key().unwrap().id, "api/w2");

        // w0 appears ahead of w2
        let after = snapshot(vec![
            worker("api", "w0", WorkerState::Idle),
            worker("api", "w1", WorkerState::Idle),
            worker("api", "w2", WorkerState::Working),
        ]);
        selection.resolve(&visible_entities(&after, Section::Workers, None));
        assert_eq!(selection.index(), 2);
        assert_eq!(selection.key().unwrap().id, "api/w2");
    }

    #[test]
    fn test_cursor_clamps_when_entity_disappears() {
        let before = snapshot(vec![
            worker("api", "w1", WorkerState::Idle),
            worker("api", "w2", WorkerState::Idle),
        ]);
        let mut selection = Selection::default();
        selection.move_by(isize::MAX, &visible_entities(&before, Section::Workers, None));

        let after = snapshot(vec![worker("api", "w1", WorkerState::Idle)]);
        selection.resolve(&visible_entities(&after, Section::Workers, None));
        assert_eq!(selection.index(), 0);
        assert_eq!(selection.key().unwrap().id, "api/w1");

        selection.resolve(&[]);
        assert!(selection.key().is_none());
    }

    #[test]
    fn test_filter_by_project_and_state() {
        let snap = snapshot(vec![
            worker("api", "w1", WorkerState::Idle),
            worker("web", "w2", WorkerState::Stalled),
            worker("api", "w3", WorkerState::Stalled),
        ]);
        let by_project = ListFilter {
            field: FilterField::Project,
            value: "api".into(),
        };
        assert_eq!(
            visible_entities(&snap, Section::Workers, Some(&by_project)).len(),
            2
        );

        let by_state = ListFilter {
            field: FilterField::State,
            value: "stalled".into(),
        };
        let stalled = visible_entities(&snap, Section::Workers, Some(&by_state));
        assert_eq!(stalled.len(), 2);
        assert_eq!(
            FilterField::State.candidates(&snap, Section::Workers),
            vec!["idle", "stalled"]
        );
    }

    #[test]
    fn test_state_filter_passes_stateless_sections() {
        let mut snap = snapshot(Vec::new());
        snap.projects.push(Project {
            name: "api".into(),
            ..Project::default()
        });
        let filter = ListFilter {
            field: FilterField::State,
            value: "idle".into(),
        };
        assert_eq!(
            visible_entities(&snap, Section::Projects, Some(&filter)).len(),
            1
        );
    }
}
