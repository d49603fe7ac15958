//! Authoritative task list and its mirror in the `tasks` slot.
//!
//! Every mutation runs to completion in three steps: change the in-memory list, write the
//! whole list to the slot, then notify subscribers with the new snapshot. A failed write
//! never rolls back the in-memory change; it is logged and kept as a [`ErrorNotice`] for
//! the UI to show.

use std::collections::HashSet;

use shared::{
    domain::{Task, TaskId, TaskText},
    error::{ErrorNotice, StoreError},
    protocol::{decode_task_list, encode_task_list, CORRUPT_TASKS_KEY, TASKS_KEY},
};
use storage::SlotStore;
use tracing::{debug, error, info, warn};

use crate::{
    clock::{Clock, SystemClock},
    confirm::Confirm,
    ids::{IdSource, MonotonicIds},
};

pub const CLEAR_ALL_PROMPT: &str = "Are you sure you want to delete all tasks?";

/// What changed, delivered alongside the new snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Loaded,
    Added(TaskId),
    Toggled(TaskId),
    Deleted(TaskId),
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks.iter().filter(|task| task.completed).count(),
        }
    }

    pub fn total_label(&self) -> String {
        format!("Total : {}", self.total)
    }

    pub fn completed_label(&self) -> String {
        format!("Completed: {}", self.completed)
    }
}

type Listener = Box<dyn FnMut(&StoreEvent, &[Task])>;

pub struct TaskStore<S> {
    slot: S,
    tasks: Vec<Task>,
    ids: Box<dyn IdSource>,
    clock: Box<dyn Clock>,
    listeners: Vec<Listener>,
    notice: Option<ErrorNotice>,
}

impl<S: SlotStore> TaskStore<S> {
    /// Store with time-derived ids and the system clock. Call [`TaskStore::load`] before use.
    pub fn new(slot: S) -> Self {
        Self::with_sources(slot, MonotonicIds::new(), SystemClock)
    }

    pub fn with_sources(
        slot: S,
        ids: impl IdSource + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            slot,
            tasks: Vec::new(),
            ids: Box::new(ids),
            clock: Box::new(clock),
            listeners: Vec::new(),
            notice: None,
        }
    }

    /// Registers a "list changed" listener. Listeners run synchronously, in registration
    /// order, after the change has been persisted.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent, &[Task]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::of(&self.tasks)
    }

    /// Most recent non-fatal problem (storage, corrupt state, id exhaustion), cleared on read.
    pub fn take_notice(&mut self) -> Option<ErrorNotice> {
        self.notice.take()
    }

    /// Replaces the in-memory list with the persisted one.
    ///
    /// A missing slot yields an empty list. An unreadable or malformed slot also yields an
    /// empty list; the raw value is copied to `tasks.corrupt` first and a notice is raised.
    /// Subscribers are notified in every case.
    pub fn load(&mut self) {
        self.tasks = match self.slot.get(TASKS_KEY) {
            Ok(None) => {
                debug!("no persisted tasks; starting empty");
                Vec::new()
            }
            Ok(Some(raw)) => match decode_task_list(&raw) {
                Ok(tasks) => sanitize_loaded(tasks),
                Err(err) => {
                    error!(error = %err, "persisted task list is malformed; starting empty");
                    if let Err(backup_err) = self.slot.set(CORRUPT_TASKS_KEY, &raw) {
                        warn!(error = %backup_err, "failed to keep a copy of the malformed task list");
                    }
                    self.notice = Some(ErrorNotice::from(&err));
                    Vec::new()
                }
            },
            Err(source) => {
                let err = StoreError::storage(TASKS_KEY, source);
                error!(error = %err, "failed to read persisted tasks; starting empty");
                self.notice = Some(ErrorNotice::from(&err));
                Vec::new()
            }
        };

        if let Some(max) = self.tasks.iter().map(|task| task.id).max() {
            self.ids.observe(max);
        }
        info!(count = self.tasks.len(), "loaded tasks");
        self.notify(StoreEvent::Loaded);
    }

    /// Appends a task. Blank text is ignored: nothing is created, written or signalled.
    /// Running out of ids raises a notice and likewise creates nothing.
    pub fn add(&mut self, raw: &str) -> Option<TaskId> {
        let text = TaskText::parse(raw)?;

        let id = loop {
            match self.ids.next_id() {
                Some(id) if self.get(id).is_some() => continue,
                Some(id) => break id,
                None => {
                    let last = self
                        .tasks
                        .iter()
                        .map(|task| task.id.0)
                        .max()
                        .unwrap_or(i64::MAX);
                    let err = StoreError::IdsExhausted { last };
                    warn!(error = %err, "cannot add task");
                    self.notice = Some(ErrorNotice::from(&err));
                    return None;
                }
            }
        };
        let task = Task::new(id, text, self.clock.now());
        debug!(task_id = %id, "adding task");
        self.tasks.push(task);
        self.commit(StoreEvent::Added(id));
        Some(id)
    }

    /// Flips `completed`. Unknown ids are ignored.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(task_id = %id, "toggle for unknown task ignored");
            return false;
        };
        task.completed = !task.completed;
        self.commit(StoreEvent::Toggled(id));
        true
    }

    /// Removes the task. Unknown ids are ignored.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!(task_id = %id, "delete for unknown task ignored");
            return false;
        }
        self.commit(StoreEvent::Deleted(id));
        true
    }

    /// Empties the list after the user agrees. An already empty list is left alone without
    /// asking.
    pub fn clear_all(&mut self, confirm: &mut dyn Confirm) -> bool {
        if self.tasks.is_empty() {
            return false;
        }
        if !confirm.confirm(CLEAR_ALL_PROMPT) {
            debug!(count = self.tasks.len(), "clear all cancelled");
            return false;
        }
        self.tasks.clear();
        self.commit(StoreEvent::Cleared);
        true
    }

    fn commit(&mut self, event: StoreEvent) {
        if let Err(err) = self.persist() {
            warn!(error = %err, ?event, "failed to persist tasks; keeping in-memory state");
            self.notice = Some(ErrorNotice::from(&err));
        }
        self.notify(event);
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let encoded = encode_task_list(&self.tasks)?;
        self.slot
            .set(TASKS_KEY, &encoded)
            .map_err(|source| StoreError::storage(TASKS_KEY, source))
    }

    fn notify(&mut self, event: StoreEvent) {
        for listener in &mut self.listeners {
            listener(&event, &self.tasks);
        }
    }
}

/// Drops records that break the list invariants: blank text or an id seen earlier.
fn sanitize_loaded(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    let total = tasks.len();
    let kept: Vec<Task> = tasks
        .into_iter()
        .filter(|task| TaskText::parse(&task.text).is_some() && seen.insert(task.id))
        .collect();
    if kept.len() != total {
        warn!(
            dropped = total - kept.len(),
            "ignored persisted tasks with blank text or duplicate ids"
        );
    }
    kept
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
