//! Min Core
//!
//! Central coordination layer: owns the task store, guards and dispatches
//! commands from menus, IPC, the search bar and the command line, and reports
//! the resulting UI work back to the caller.

mod browser;
mod command;
mod config;
mod error;
mod l10n;
mod launch;
mod modes;

pub use browser::{BangSuggestion, Browser, TaskSuggestion};
pub use command::{AddTabPayload, Command, OpenTaskFilePayload, SwitchToTaskPayload, UiEffect};
pub use config::Config;
pub use error::CoreError;
pub use l10n::{Localizer, StaticLocalizer};
pub use launch::commands_from_args;
pub use modes::{Guard, Modes};

// Re-export core components
pub use min_search::{BangDef, BangInvocation, BangKind, BangRegistry, SearchError};
pub use min_tabs::{NewTab, Placement, Tab, TabError, TabId, TabStore, TabUpdate};
pub use min_tasks::{Destination, Moved, Task, TaskError, TaskFile, TaskId, TaskInit, TaskStore};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging. `RUST_LOG` takes precedence over `default_filter`.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt().with_env_filter(filter).with_target(true).init();
}
