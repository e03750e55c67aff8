//! Task error types

use min_tabs::{TabError, TabId};
use thiserror::Error;

use crate::task::TaskId;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Tab not found: {0}")]
    TabNotFound(TabId),

    #[error("Malformed task file: {0}")]
    MalformedPersistedState(String),

    #[error("Tab error: {0}")]
    Tab(#[from] TabError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
