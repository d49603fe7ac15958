//! Persisted slot layout: key `"tasks"` holding a JSON array of task objects in list order.

use crate::{domain::Task, error::StoreError};

pub const TASKS_KEY: &str = "tasks";
/// Where an unparseable `tasks` value is copied before the list is reset.
pub const CORRUPT_TASKS_KEY: &str = "tasks.corrupt";

pub fn encode_task_list(tasks: &[Task]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(tasks)?)
}

pub fn decode_task_list(raw: &str) -> Result<Vec<Task>, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Corrupt {
        key: TASKS_KEY.to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
