pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileRepository;
pub use memory::MemoryRepository;
pub use traits::{PreferenceRepository, SnapshotRepository};
