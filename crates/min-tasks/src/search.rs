//! Task and tab search for search-bar suggestions

use chrono::{DateTime, Utc};

use min_search::is_match;
use min_tabs::TabId;

use crate::activity::sort_by_activity_descending;
use crate::store::TaskStore;
use crate::task::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMatch {
    pub task_id: TaskId,
    pub last_activity: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabMatch {
    pub tab_id: TabId,
    pub task_id: TaskId,
    pub last_activity: DateTime<Utc>,
}

/// Tasks by recent activity, filtered by printed name when `query` is not empty
pub fn search_and_sort_tasks(store: &TaskStore, query: &str, exclude_selected: bool) -> Vec<TaskMatch> {
    let selected = store.selected_id();

    let candidates = store
        .iter()
        .filter(|t| !(exclude_selected && t.id == selected))
        .map(|t| TaskMatch {
            task_id: t.id,
            last_activity: t.last_activity(),
        })
        .collect();

    let sorted = sort_by_activity_descending(candidates, |m: &TaskMatch| m.last_activity);

    let query = query.trim();
    if query.is_empty() {
        return sorted;
    }

    sorted
        .into_iter()
        .filter(|m| {
            store
                .printed_name(m.task_id)
                .is_some_and(|name| is_match(&name.to_lowercase(), query))
        })
        .collect()
}

/// Best task for a search-bar query: the most recently used matching task
/// other than the selected one
pub fn first_task_match(store: &TaskStore, query: &str) -> Option<TaskId> {
    search_and_sort_tasks(store, query, true)
        .first()
        .map(|m| m.task_id)
}

/// Tabs by recent activity, filtered by title when `query` is not empty.
/// Searches every tab unless `candidates` narrows it down; the tab the user
/// is looking at is never suggested.
pub fn search_and_sort_tabs(
    store: &TaskStore,
    query: &str,
    candidates: Option<&[TabId]>,
) -> Vec<TabMatch> {
    let current = store.selected_tab().map(|t| t.id.clone());

    let tabs = store
        .iter()
        .flat_map(|task| task.tabs().iter().map(move |tab| (task.id, tab)))
        .filter(|(_, tab)| candidates.map_or(true, |c| c.contains(&tab.id)))
        .filter(|(_, tab)| current.as_ref() != Some(&tab.id))
        .filter(|(_, tab)| {
            let query = query.trim();
            query.is_empty() || is_match(&tab.title.to_lowercase(), query)
        })
        .map(|(task_id, tab)| TabMatch {
            tab_id: tab.id.clone(),
            task_id,
            last_activity: tab.last_activity,
        })
        .collect();

    sort_by_activity_descending(tabs, |m: &TabMatch| m.last_activity)
}

/// Tabs currently playing audio, in display order
pub fn tabs_with_audio(store: &TaskStore) -> Vec<TabId> {
    store
        .iter()
        .flat_map(|task| task.tabs().iter())
        .filter(|tab| tab.has_audio)
        .map(|tab| tab.id.clone())
        .collect()
}
