use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::error::ImportError;
use crate::model::stats::TaskStats;
use crate::model::task::{Priority, Task};
use crate::repository::traits::SnapshotRepository;
use crate::snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStatus {
    All,
    Active,
    Completed,
}

impl Default for FilterStatus {
    fn default() -> Self {
        FilterStatus::All
    }
}

impl FilterStatus {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterStatus::All => true,
            FilterStatus::Active => !task.completed,
            FilterStatus::Completed => task.completed,
        }
    }
}

/// Status predicate ANDed with a case-insensitive substring match on
/// the task text. An empty query matches everything.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub status: FilterStatus,
    pub query: String,
}

impl FilterCriteria {
    /// Builds the predicate once per scan; the query is lowercased here
    /// rather than per task.
    pub fn matcher(&self) -> impl Fn(&Task) -> bool + '_ {
        let query = self.query.to_lowercase();
        move |task| self.status.matches(task) && task.text.to_lowercase().contains(&query)
    }
}

/// The ordered task list plus its persistence adapter. Every mutating
/// operation saves through the adapter afterwards; a failed save is
/// logged and the in-memory mutation stands (persistence is best
/// effort, not transactional).
pub struct TaskStore<R: SnapshotRepository> {
    tasks: Vec<Task>,
    repo: R,
}

impl<R: SnapshotRepository> TaskStore<R> {
    /// Loads the persisted list once. A load failure degrades to an
    /// empty in-memory list rather than failing construction.
    pub fn new(repo: R) -> Self {
        let tasks = match repo.load() {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "could not load persisted tasks, starting empty");
                Vec::new()
            }
        };
        Self { tasks, repo }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Appends a task with default fields. Whitespace-only text is
    /// rejected as a silent no-op.
    pub fn add(&mut self, text: &str) -> Option<Uuid> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let task = Task::new(trimmed.to_string());
        let id = task.id;
        self.tasks.push(task);
        self.persist();
        Some(id)
    }

    pub fn toggle_complete(&mut self, id: Uuid) {
        if let Some(task) = self.task_mut(id) {
            task.completed = !task.completed;
            self.persist();
        }
    }

    /// Replaces the text if the replacement is non-empty after
    /// trimming; otherwise the edit is abandoned, not cleared.
    pub fn edit(&mut self, id: Uuid, new_text: &str) {
        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            return;
        }
        if let Some(task) = self.task_mut(id) {
            task.text = trimmed.to_string();
            self.persist();
        }
    }

    pub fn delete(&mut self, id: Uuid) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != before {
            self.persist();
        }
    }

    pub fn set_priority(&mut self, id: Uuid, value: u8) {
        if let Some(task) = self.task_mut(id) {
            task.priority = Priority::from_value(value);
            self.persist();
        }
    }

    pub fn cycle_priority(&mut self, id: Uuid) {
        if let Some(task) = self.task_mut(id) {
            task.priority = task.priority.next();
            self.persist();
        }
    }

    pub fn set_due_date(&mut self, id: Uuid, date: Option<DateTime<Utc>>) {
        if let Some(task) = self.task_mut(id) {
            task.due_date = date;
            self.persist();
        }
    }

    /// Moves the task at `from` to `to`, shifting everything between.
    /// Matches the splice semantics of a drag-and-drop list.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from >= self.tasks.len() || to >= self.tasks.len() {
            return;
        }
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        self.persist();
    }

    pub fn bulk_complete(&mut self) {
        for task in &mut self.tasks {
            task.completed = true;
        }
        self.persist();
    }

    pub fn bulk_delete_completed(&mut self) {
        self.tasks.retain(|t| !t.completed);
        self.persist();
    }

    /// Lazy, restartable view over the list. Never mutates; calling it
    /// again restarts the iteration.
    pub fn filter<'a>(&'a self, criteria: &'a FilterCriteria) -> impl Iterator<Item = &'a Task> {
        let matches = criteria.matcher();
        self.tasks.iter().filter(move |t| matches(t))
    }

    /// Serializes the full list, not a filtered view.
    pub fn export_snapshot(&self) -> Result<String, serde_json::Error> {
        snapshot::to_json(&self.tasks)
    }

    /// Replaces the entire list if the payload is well-formed; on any
    /// parse or validation error the current list is left untouched.
    pub fn import_snapshot(&mut self, payload: &str) -> Result<(), ImportError> {
        let tasks = snapshot::from_json(payload)?;
        self.tasks = tasks;
        self.persist();
        Ok(())
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::collect(&self.tasks)
    }

    fn task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn persist(&self) {
        if let Err(e) = self.repo.save(&self.tasks) {
            warn!(error = %e, "could not persist tasks, keeping in-memory state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryRepository;
    use chrono::Duration;

    fn store_with(texts: &[&str]) -> TaskStore<MemoryRepository> {
        let mut store = TaskStore::new(MemoryRepository::new());
        for text in texts {
            store.add(text);
        }
        store
    }

    #[test]
    fn test_add_appends_with_defaults() {
        let mut store = store_with(&[]);
        let id = store.add("Buy milk").unwrap();

        assert_eq!(store.tasks().len(), 1);
        let task = store.find(id).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::None);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_add_rejects_empty_and_whitespace() {
        let mut store = store_with(&[]);
        assert!(store.add("").is_none());
        assert!(store.add("   ").is_none());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_add_trims_text() {
        let mut store = store_with(&[]);
        let id = store.add("  padded  ").unwrap();
        assert_eq!(store.find(id).unwrap().text, "padded");
    }

    #[test]
    fn test_toggle_complete_flips_and_ignores_unknown_id() {
        let mut store = store_with(&["one"]);
        let id = store.tasks()[0].id;

        store.toggle_complete(id);
        assert!(store.find(id).unwrap().completed);
        store.toggle_complete(id);
        assert!(!store.find(id).unwrap().completed);

        let before = store.tasks().to_vec();
        store.toggle_complete(Uuid::new_v4());
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_edit_replaces_text_but_abandons_empty() {
        let mut store = store_with(&["draft"]);
        let id = store.tasks()[0].id;

        store.edit(id, "final");
        assert_eq!(store.find(id).unwrap().text, "final");

        store.edit(id, "   ");
        assert_eq!(store.find(id).unwrap().text, "final");
    }

    #[test]
    fn test_delete_removes_matching_id_only() {
        let mut store = store_with(&["one", "two"]);
        let id = store.tasks()[0].id;

        store.delete(id);
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].text, "two");

        store.delete(id); // already gone, no-op
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_set_priority_wraps_mod_three() {
        let mut store = store_with(&["task"]);
        let id = store.tasks()[0].id;

        store.set_priority(id, 2);
        assert_eq!(store.find(id).unwrap().priority, Priority::High);
        store.set_priority(id, 4);
        assert_eq!(store.find(id).unwrap().priority, Priority::Medium);
    }

    #[test]
    fn test_cycle_priority_three_times_is_identity() {
        let mut store = store_with(&["task"]);
        let id = store.tasks()[0].id;
        let original = store.find(id).unwrap().priority;

        store.cycle_priority(id);
        assert_eq!(store.find(id).unwrap().priority, Priority::Medium);
        store.cycle_priority(id);
        store.cycle_priority(id);
        assert_eq!(store.find(id).unwrap().priority, original);
    }

    #[test]
    fn test_set_due_date_sets_and_clears() {
        let mut store = store_with(&["task"]);
        let id = store.tasks()[0].id;
        let due = Utc::now() + Duration::days(3);

        store.set_due_date(id, Some(due));
        assert_eq!(store.find(id).unwrap().due_date, Some(due));

        store.set_due_date(id, None);
        assert!(store.find(id).unwrap().due_date.is_none());
    }

    #[test]
    fn test_reorder_moves_and_shifts() {
        let mut store = store_with(&["a", "b", "c"]);
        store.reorder(0, 2);
        let texts: Vec<_> = store.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["b", "c", "a"]);
    }

    #[test]
    fn test_reorder_preserves_identity_and_fields() {
        let mut store = store_with(&["a", "b", "c"]);
        let mut before = store.tasks().to_vec();
        store.reorder(2, 0);

        let mut after = store.tasks().to_vec();
        before.sort_by_key(|t| t.id);
        after.sort_by_key(|t| t.id);
        assert_eq!(before, after);
    }

    #[test]
    fn test_reorder_out_of_bounds_is_noop() {
        let mut store = store_with(&["a", "b"]);
        let before = store.tasks().to_vec();
        store.reorder(0, 5);
        store.reorder(5, 0);
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_bulk_complete_then_bulk_delete_scenario() {
        let mut store = store_with(&["A", "B"]);
        let b = store.tasks()[1].id;
        store.toggle_complete(b);

        store.bulk_delete_completed();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].text, "A");

        store.add("B");
        store.bulk_complete();
        assert!(store.tasks().iter().all(|t| t.completed));
    }

    #[test]
    fn test_filter_by_status() {
        let mut store = store_with(&["open", "done"]);
        let done = store.tasks()[1].id;
        store.toggle_complete(done);

        let criteria = FilterCriteria {
            status: FilterStatus::Completed,
            query: String::new(),
        };
        let completed: Vec<_> = store.filter(&criteria).collect();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].text, "done");

        let criteria = FilterCriteria {
            status: FilterStatus::Active,
            query: String::new(),
        };
        let active: Vec<_> = store.filter(&criteria).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "open");
    }

    #[test]
    fn test_filter_search_is_case_insensitive_and_anded() {
        let mut store = store_with(&["Buy Foo", "buy bar", "foo again"]);
        let foo_again = store.tasks()[2].id;
        store.toggle_complete(foo_again);

        let criteria = FilterCriteria {
            status: FilterStatus::All,
            query: "foo".to_string(),
        };
        assert_eq!(store.filter(&criteria).count(), 2);

        let criteria = FilterCriteria {
            status: FilterStatus::Active,
            query: "FOO".to_string(),
        };
        let hits: Vec<_> = store.filter(&criteria).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Buy Foo");
    }

    #[test]
    fn test_matcher_is_reusable_across_tasks() {
        let criteria = FilterCriteria {
            status: FilterStatus::Active,
            query: "MiLk".to_string(),
        };
        let matches = criteria.matcher();

        let buy = Task::new("Buy milk".to_string());
        let mut done = Task::new("milk run".to_string());
        done.completed = true;

        assert!(matches(&buy));
        assert!(!matches(&done));
        assert!(!matches(&Task::new("unrelated".to_string())));
    }

    #[test]
    fn test_filter_is_restartable_and_does_not_mutate() {
        let store = store_with(&["a", "b"]);
        let criteria = FilterCriteria::default();
        assert_eq!(store.filter(&criteria).count(), 2);
        assert_eq!(store.filter(&criteria).count(), 2);
        assert_eq!(store.tasks().len(), 2);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut store = store_with(&["first", "second"]);
        let id = store.tasks()[0].id;
        store.cycle_priority(id);
        store.toggle_complete(id);

        let payload = store.export_snapshot().unwrap();
        let original = store.tasks().to_vec();

        let mut other = TaskStore::new(MemoryRepository::new());
        other.import_snapshot(&payload).unwrap();
        assert_eq!(other.tasks(), original.as_slice());
    }

    #[test]
    fn test_import_failure_leaves_list_untouched() {
        let mut store = store_with(&["keep me"]);
        let before = store.tasks().to_vec();

        let err = store.import_snapshot("not json").unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_import_replaces_wholesale() {
        let donor = store_with(&["new one", "new two"]);
        let payload = donor.export_snapshot().unwrap();

        let mut store = store_with(&["old"]);
        store.import_snapshot(&payload).unwrap();
        assert_eq!(store.tasks().len(), 2);
        assert_eq!(store.tasks()[0].text, "new one");
    }

    #[test]
    fn test_mutations_are_persisted() {
        let repo = MemoryRepository::new();
        let mut store = TaskStore::new(repo.clone());

        store.add("persisted");
        assert_eq!(repo.saved_tasks().len(), 1);

        store.bulk_delete_completed();
        store.bulk_complete();
        assert!(repo.saved_tasks()[0].completed);
    }

    #[test]
    fn test_save_failure_does_not_block_mutation() {
        let repo = MemoryRepository::new();
        let mut store = TaskStore::new(repo.clone());
        repo.set_fail_saves(true);

        let id = store.add("unsaved but present").unwrap();
        assert!(store.find(id).is_some());
        assert!(repo.saved_tasks().is_empty());
    }

    #[test]
    fn test_new_loads_persisted_tasks() {
        let repo = MemoryRepository::with_tasks(vec![Task::new("seed".to_string())]);
        let store = TaskStore::new(repo);
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_stats_reflect_list() {
        let mut store = store_with(&["a", "b", "c"]);
        let id = store.tasks()[0].id;
        store.toggle_complete(id);

        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.active, 2);
    }
}
