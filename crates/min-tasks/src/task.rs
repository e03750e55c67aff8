//! Task data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use min_tabs::{Tab, TabId, TabStore};

/// Task identifier, assigned in increasing order by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// User-given name; a positional name is derived when absent
    pub name: Option<String>,
    /// Display hint for the task name in the navbar
    pub collapsed: bool,
    pub(crate) tabs: TabStore,
    pub(crate) last_activity: DateTime<Utc>,
}

impl Task {
    pub(crate) fn new(id: TaskId, name: Option<String>, collapsed: bool) -> Self {
        Self {
            id,
            name: name.filter(|n| !n.trim().is_empty()),
            collapsed,
            tabs: TabStore::new(),
            last_activity: Utc::now(),
        }
    }

    pub fn tabs(&self) -> &TabStore {
        &self.tabs
    }

    pub fn selected_tab(&self) -> Option<&TabId> {
        self.tabs.selected()
    }

    /// Latest of the task's own activity and that of its tabs
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.tabs
            .iter()
            .map(|t| t.last_activity)
            .fold(self.last_activity, |latest, t| latest.max(t))
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

/// Initial data for a task added to the store
#[derive(Debug, Clone, Default)]
pub struct TaskInit {
    pub name: Option<String>,
    pub collapsed: bool,
    /// Tabs to start with; a blank tab is created when empty
    pub tabs: Vec<Tab>,
    /// Tab to select, defaults to the first
    pub selected_tab: Option<TabId>,
}

impl TaskInit {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}
