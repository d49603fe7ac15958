use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    StorageUnavailable,
    CorruptState,
    IdsExhausted,
    Internal,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage slot '{key}' unavailable: {source}")]
    Storage { key: String, source: anyhow::Error },
    #[error("persisted value under '{key}' is malformed: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    #[error("no task ids left after {last}")]
    IdsExhausted { last: i64 },
    #[error("failed to serialize task list: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub fn storage(key: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Storage {
            key: key.into(),
            source,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Storage { .. } => ErrorCode::StorageUnavailable,
            Self::Corrupt { .. } => ErrorCode::CorruptState,
            Self::IdsExhausted { .. } => ErrorCode::IdsExhausted,
            Self::Serialize(_) => ErrorCode::Internal,
        }
    }
}

/// User-facing summary of a non-fatal failure, detached from its error source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&StoreError> for ErrorNotice {
    fn from(value: &StoreError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}
