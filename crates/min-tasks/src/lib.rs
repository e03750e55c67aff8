//! Min Task Management
//!
//! A task is a named group of tabs, the browser's top-level organizational
//! unit. The [`TaskStore`] owns every task and guarantees that:
//! - the store is never empty and its selected task always exists
//! - every task holds at least one tab, with a valid selected tab
//! - a tab keeps its identity when it moves between tasks

mod activity;
mod error;
mod moving;
mod search;
mod store;
mod task;
mod task_file;

pub use activity::sort_by_activity_descending;
pub use error::TaskError;
pub use moving::{Destination, Moved};
pub use search::{
    first_task_match, search_and_sort_tabs, search_and_sort_tasks, tabs_with_audio, TabMatch,
    TaskMatch,
};
pub use store::{TaskStore, DEFAULT_NAME_TEMPLATE};
pub use task::{Task, TaskId, TaskInit};
pub use task_file::{Restored, TabRecord, TaskFile};

pub type Result<T> = std::result::Result<T, TaskError>;
