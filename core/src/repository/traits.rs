use crate::error::StorageError;
use crate::model::task::Task;

/// Persistence contract consumed by the store: loaded once at startup,
/// saved after every mutation.
pub trait SnapshotRepository {
    fn load(&self) -> Result<Vec<Task>, StorageError>;
    fn save(&self, tasks: &[Task]) -> Result<(), StorageError>;
}

/// Display preferences persisted separately from the task list.
pub trait PreferenceRepository {
    fn load_dark_mode(&self) -> Result<bool, StorageError>;
    fn save_dark_mode(&self, dark_mode: bool) -> Result<(), StorageError>;
}
