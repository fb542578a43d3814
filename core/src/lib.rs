pub mod error;
pub mod model;
pub mod repository;
pub mod snapshot;
pub mod store;
pub mod time;

pub use error::{ImportError, StorageError};
pub use model::stats::TaskStats;
pub use model::task::{Priority, Task};
pub use repository::{FileRepository, MemoryRepository, PreferenceRepository, SnapshotRepository};
pub use store::{FilterCriteria, FilterStatus, TaskStore};
pub use time::parse_human_date;
