use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::StorageError;
use crate::model::task::Task;
use crate::repository::traits::{PreferenceRepository, SnapshotRepository};

/// In-memory persistence fake. Clones share the same backing storage,
/// so a test can hand one handle to the store and keep another to
/// inspect what was saved or to flip the failure toggle.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    tasks: Rc<RefCell<Vec<Task>>>,
    dark_mode: Rc<Cell<bool>>,
    fail_saves: Rc<Cell<bool>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let repo = Self::default();
        *repo.tasks.borrow_mut() = tasks;
        repo
    }

    /// Makes every subsequent `save` fail, simulating an unavailable or
    /// quota-exceeded backend.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    pub fn saved_tasks(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }
}

impl SnapshotRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        Ok(self.tasks.borrow().clone())
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        if self.fail_saves.get() {
            return Err(StorageError::Unavailable(
                "simulated save failure".to_string(),
            ));
        }
        *self.tasks.borrow_mut() = tasks.to_vec();
        Ok(())
    }
}

impl PreferenceRepository for MemoryRepository {
    fn load_dark_mode(&self) -> Result<bool, StorageError> {
        Ok(self.dark_mode.get())
    }

    fn save_dark_mode(&self, dark_mode: bool) -> Result<(), StorageError> {
        self.dark_mode.set(dark_mode);
        Ok(())
    }
}
