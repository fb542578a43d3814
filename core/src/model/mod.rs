pub mod stats;
pub mod task;

pub use stats::TaskStats;
pub use task::{Priority, Task};
