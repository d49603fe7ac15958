//! Input/trigger layer: draft text, key handling and command dispatch on top of the store.

use std::{
    cell::{Cell, Ref, RefCell},
    rc::Rc,
};

use shared::{domain::TaskId, error::ErrorNotice};
use storage::SlotStore;
use tracing::debug;

use crate::{
    confirm::Confirm,
    store::TaskStore,
    view::{apply_action, TaskAction, TaskListView},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// User intents coming from whatever surface drives the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCommand {
    AddDraft,
    KeyPressed(Key),
    Row(TaskAction),
    ClearAll,
}

impl BoardCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::AddDraft => "add_draft",
            Self::KeyPressed(_) => "key_pressed",
            Self::Row(TaskAction::Toggle(_)) => "toggle",
            Self::Row(TaskAction::Delete(_)) => "delete",
            Self::ClearAll => "clear_all",
        }
    }
}

pub struct TaskBoard<S> {
    store: TaskStore<S>,
    draft: String,
    view: Rc<RefCell<TaskListView>>,
    renders: Rc<Cell<u64>>,
}

impl<S: SlotStore> TaskBoard<S> {
    /// Wires the view to the store's change signal and loads persisted state.
    pub fn open(mut store: TaskStore<S>) -> Self {
        let view = Rc::new(RefCell::new(TaskListView::default()));
        let renders = Rc::new(Cell::new(0));

        let view_sink = Rc::clone(&view);
        let render_counter = Rc::clone(&renders);
        store.subscribe(move |_, tasks| {
            *view_sink.borrow_mut() = TaskListView::from_snapshot(tasks);
            render_counter.set(render_counter.get() + 1);
        });
        store.load();

        Self {
            store,
            draft: String::new(),
            view,
            renders,
        }
    }

    pub fn view(&self) -> Ref<'_, TaskListView> {
        self.view.borrow()
    }

    /// How many times the view has been rebuilt.
    pub fn render_count(&self) -> u64 {
        self.renders.get()
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn take_notice(&mut self) -> Option<ErrorNotice> {
        self.store.take_notice()
    }

    /// Adds the draft as a task and clears the input, but only if a task was created.
    pub fn submit_draft(&mut self) -> Option<TaskId> {
        let id = self.store.add(&self.draft)?;
        self.draft.clear();
        Some(id)
    }

    pub fn on_key(&mut self, key: Key) -> Option<TaskId> {
        match key {
            Key::Enter => self.submit_draft(),
            Key::Other => None,
        }
    }

    pub fn toggle(&mut self, id: TaskId) -> bool {
        apply_action(&mut self.store, TaskAction::Toggle(id))
    }

    pub fn delete(&mut self, id: TaskId) -> bool {
        apply_action(&mut self.store, TaskAction::Delete(id))
    }

    pub fn request_clear_all(&mut self, confirm: &mut dyn Confirm) -> bool {
        self.store.clear_all(confirm)
    }

    /// Runs one command to completion. Returns whether the task list changed.
    pub fn handle(&mut self, command: BoardCommand, confirm: &mut dyn Confirm) -> bool {
        debug!(command = command.name(), "handling board command");
        match command {
            BoardCommand::AddDraft => self.submit_draft().is_some(),
            BoardCommand::KeyPressed(key) => self.on_key(key).is_some(),
            BoardCommand::Row(action) => apply_action(&mut self.store, action),
            BoardCommand::ClearAll => self.request_clear_all(confirm),
        }
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
