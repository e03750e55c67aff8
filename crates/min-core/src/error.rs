//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Task error: {0}")]
    Task(#[from] min_tasks::TaskError),

    #[error("Tab error: {0}")]
    Tab(#[from] min_tabs::TabError),

    #[error("Search error: {0}")]
    Search(#[from] min_search::SearchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
