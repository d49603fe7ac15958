//! Task list core: the authoritative store, its view model and the input layer driving it.

pub mod board;
pub mod clock;
pub mod config;
pub mod confirm;
pub mod ids;
pub mod store;
pub mod view;

pub use board::{BoardCommand, Key, TaskBoard};
pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm};
pub use shared::domain::{Task, TaskId, TaskText};
pub use store::{StoreEvent, TaskCounts, TaskStore, CLEAR_ALL_PROMPT};
pub use view::{TaskAction, TaskListView, TaskRow, TextStyle};
