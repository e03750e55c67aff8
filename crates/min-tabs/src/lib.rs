//! Min Tab Store
//!
//! The per-task ordered collection of tabs. A tab keeps its identity for its
//! whole lifetime, including when it is handed over to another task's store.

mod error;
mod store;
mod tab;

pub use error::TabError;
pub use store::{Placement, TabStore};
pub use tab::{NewTab, Tab, TabId, TabUpdate};

pub type Result<T> = std::result::Result<T, TabError>;
