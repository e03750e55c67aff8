//! Commands and UI effects
//!
//! Menus, IPC messages, the search bar and launch arguments all produce a
//! [`Command`]. Dispatching one returns the [`UiEffect`]s the window
//! controller has to carry out.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use min_search::BangInvocation;
use min_tabs::TabId;
use min_tasks::TaskId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTabPayload {
    #[serde(default)]
    pub url: Option<String>,
    /// Name or 1-based number of the task to open the tab in
    #[serde(default)]
    pub task_query: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchToTaskPayload {
    #[serde(default)]
    pub task_query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTaskFilePayload {
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "camelCase")]
pub enum Command {
    AddTab(AddTabPayload),
    AddPrivateTab,
    DuplicateTab,
    SwitchToTask(SwitchToTaskPayload),
    OpenTaskFile(OpenTaskFilePayload),
    ToggleCollapsed,
    ToggleTaskOverlay,
    Bang(BangInvocation),
}

impl Command {
    /// Whether modal and focus mode apply to this command
    pub fn is_guarded(&self) -> bool {
        !matches!(self, Command::ToggleCollapsed | Command::ToggleTaskOverlay)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddTab(_) => "addTab",
            Command::AddPrivateTab => "addPrivateTab",
            Command::DuplicateTab => "duplicateTab",
            Command::SwitchToTask(_) => "switchToTask",
            Command::OpenTaskFile(_) => "openTaskFile",
            Command::ToggleCollapsed => "toggleCollapsed",
            Command::ToggleTaskOverlay => "toggleTaskOverlay",
            Command::Bang(_) => "bang",
        }
    }
}

/// Work for the window controller, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", content = "data", rename_all = "camelCase")]
pub enum UiEffect {
    SwitchToTask(TaskId),
    SwitchToTab(TabId),
    #[serde(rename_all = "camelCase")]
    AddTab {
        tab_id: TabId,
        enter_edit_mode: bool,
    },
    /// A copy of the current tab was created with this id
    DuplicateTab(TabId),
    CloseTask(TaskId),
    ShowTaskOverlay,
    ToggleTaskOverlay,
    FocusModeWarning,
    RefreshTabBar,
    UpdateTaskName,
}
