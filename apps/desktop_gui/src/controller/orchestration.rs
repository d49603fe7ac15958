//! Applies collected UI events to the board and tracks dialog/banner state.

use storage::SlotStore;
use task_core::{BoardCommand, NeverConfirm, TaskBoard};

use crate::controller::events::{StatusBanner, UiEvent};

#[derive(Debug, Default)]
pub struct ShellState {
    /// Clear-all confirmation is on screen; nothing else is interactive.
    pub confirm_clear_open: bool,
    pub banner: Option<StatusBanner>,
}

pub fn apply_events<S: SlotStore>(
    board: &mut TaskBoard<S>,
    shell: &mut ShellState,
    events: impl IntoIterator<Item = UiEvent>,
) {
    for event in events {
        tracing::debug!(?event, "applying ui event");
        match event {
            UiEvent::DraftSubmitted => {
                board.handle(BoardCommand::AddDraft, &mut NeverConfirm);
            }
            UiEvent::Row(action) => {
                board.handle(BoardCommand::Row(action), &mut NeverConfirm);
            }
            UiEvent::ClearRequested => {
                // nothing to confirm on an empty list
                shell.confirm_clear_open = !board.store().is_empty();
            }
            UiEvent::ClearAnswered(answer) => {
                shell.confirm_clear_open = false;
                board.handle(BoardCommand::ClearAll, &mut |_: &str| answer);
            }
            UiEvent::BannerDismissed => shell.banner = None,
        }
        if let Some(notice) = board.take_notice() {
            shell.banner = Some(notice.into());
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
