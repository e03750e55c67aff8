//! Tab error types

use thiserror::Error;

use crate::tab::TabId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(TabId),

    #[error("Tab {0} is not part of this tab store")]
    InvalidReference(TabId),

    #[error("Tab already exists: {0}")]
    AlreadyExists(TabId),
}
