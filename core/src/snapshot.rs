use std::collections::HashSet;

use crate::error::ImportError;
use crate::model::task::Task;

/// Serializes the full task list. Export and persistence both use this
/// encoding, so an exported file can be re-imported as-is.
pub fn to_json(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tasks)
}

/// Parses and validates a snapshot payload. Decoding enforces the list
/// invariants: ids unique, text non-empty. Priority range is enforced
/// by the `Priority` deserializer itself.
pub fn from_json(payload: &str) -> Result<Vec<Task>, ImportError> {
    let tasks: Vec<Task> = serde_json::from_str(payload)?;

    let mut seen = HashSet::new();
    for task in &tasks {
        if task.text.trim().is_empty() {
            return Err(ImportError::Invalid(format!(
                "task {} has empty text",
                task.id
            )));
        }
        if !seen.insert(task.id) {
            return Err(ImportError::Invalid(format!("duplicate task id {}", task.id)));
        }
    }

    Ok(tasks)
}
