//! Controller layer: UI events collected per frame and their application to the task board.

pub mod events;
pub mod orchestration;
