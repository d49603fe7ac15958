//! View model derived from a task snapshot.
//!
//! Rebuilt from scratch on every change; surfaces (terminal, egui) only draw it and feed
//! [`TaskAction`]s back.

use shared::domain::{Task, TaskId};
use storage::SlotStore;

use crate::store::{TaskCounts, TaskStore};

pub const EMPTY_STATE_MESSAGE: &str = "No tasks yet. Add a task above to get started.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Normal,
    Completed,
}

/// Interaction bound to a row when it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Toggle(TaskId),
    Delete(TaskId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub style: TextStyle,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            completed: task.completed,
            style: if task.completed {
                TextStyle::Completed
            } else {
                TextStyle::Normal
            },
        }
    }

    pub fn toggle_action(&self) -> TaskAction {
        TaskAction::Toggle(self.id)
    }

    pub fn delete_action(&self) -> TaskAction {
        TaskAction::Delete(self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskListView {
    pub rows: Vec<TaskRow>,
    pub counts: TaskCounts,
    pub show_empty_state: bool,
}

impl TaskListView {
    pub fn from_snapshot(tasks: &[Task]) -> Self {
        Self {
            rows: tasks.iter().map(TaskRow::from_task).collect(),
            counts: TaskCounts::of(tasks),
            show_empty_state: tasks.is_empty(),
        }
    }
}

/// Routes a row action to the store. Returns whether anything changed.
pub fn apply_action<S: SlotStore>(store: &mut TaskStore<S>, action: TaskAction) -> bool {
    match action {
        TaskAction::Toggle(id) => store.toggle(id),
        TaskAction::Delete(id) => store.delete(id),
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
