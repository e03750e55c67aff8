//! Search error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Unknown bang: {0}")]
    UnknownBang(String),

    #[error("Invalid bang phrase: {0:?} (must start with '!' and contain no whitespace)")]
    InvalidPhrase(String),
}
