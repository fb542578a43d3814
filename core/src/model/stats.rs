use chrono::Utc;

use crate::model::task::{Priority, Task};

/// Derived counters for the statistics panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub high_priority: usize,
    pub overdue: usize,
}

impl TaskStats {
    pub fn collect(tasks: &[Task]) -> Self {
        let now = Utc::now();
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total,
            completed,
            active: total - completed,
            high_priority: tasks.iter().filter(|t| t.priority == Priority::High).count(),
            overdue: tasks.iter().filter(|t| t.is_overdue(now)).count(),
        }
    }
}
