//! UI events and status banner modeling for the desktop GUI.

use shared::error::{ErrorCode, ErrorNotice};
use task_core::TaskAction;

/// Something the user did during a frame. Applied after drawing, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    DraftSubmitted,
    Row(TaskAction),
    ClearRequested,
    ClearAnswered(bool),
    BannerDismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub title: &'static str,
    pub message: String,
}

impl From<ErrorNotice> for StatusBanner {
    fn from(notice: ErrorNotice) -> Self {
        Self {
            title: banner_title(notice.code),
            message: notice.message,
        }
    }
}

fn banner_title(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::StorageUnavailable => "Changes not saved",
        ErrorCode::CorruptState => "Saved tasks could not be read",
        ErrorCode::IdsExhausted => "Task not added",
        ErrorCode::Internal => "Unexpected error",
    }
}
