//! UI layer for the desktop GUI: app shell drawing the task board view model.

pub mod app;

pub use app::TasklistApp;
