use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task priority. Serialized as the integers 0/1/2 so snapshots stay
/// compatible with the `todos.json` files the app exchanges.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    None,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::None
    }
}

impl Priority {
    /// Maps any integer onto the three-value cycle (`value mod 3`).
    pub fn from_value(value: u8) -> Self {
        match value % 3 {
            0 => Priority::None,
            1 => Priority::Medium,
            _ => Priority::High,
        }
    }

    pub fn value(self) -> u8 {
        match self {
            Priority::None => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    /// The UI's priority button advances none -> medium -> high -> none.
    pub fn next(self) -> Self {
        Priority::from_value(self.value() + 1)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        priority.value()
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Priority::None),
            1 => Ok(Priority::Medium),
            2 => Ok(Priority::High),
            other => Err(format!("priority out of range: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
            priority: Priority::default(),
            due_date: None,
            created_at: Utc::now(),
        }
    }

    /// Overdue means past due and still open; completed tasks are never
    /// overdue no matter the date.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => !self.completed && due < now,
            None => false,
        }
    }
}
