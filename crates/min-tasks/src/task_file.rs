//! Task files
//!
//! A single task serialized to JSON, so it can be saved to disk and opened
//! again later. Files come from outside the process and are validated as a
//! whole before anything touches the store.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use min_tabs::{Tab, TabId};

use crate::error::TaskError;
use crate::store::TaskStore;
use crate::task::{Task, TaskId, TaskInit};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFile {
    pub id: TaskId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub collapsed: bool,
    pub tabs: Vec<TabRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_tab: Option<TabId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TabId>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub private: bool,
    /// Epoch milliseconds
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_activity: Option<DateTime<Utc>>,
}

impl TabRecord {
    fn from_tab(tab: &Tab) -> Self {
        Self {
            id: Some(tab.id.clone()),
            url: tab.url.clone(),
            title: tab.title.clone(),
            private: tab.private,
            last_activity: Some(tab.last_activity),
        }
    }

    fn into_tab(self) -> Tab {
        Tab {
            id: self.id.unwrap_or_else(TabId::generate),
            url: self.url,
            title: self.title,
            private: self.private,
            last_activity: self.last_activity.unwrap_or_else(Utc::now),
            has_audio: false,
        }
    }
}

impl TaskFile {
    /// Parse and validate a task file
    pub fn parse(json: &str) -> Result<Self> {
        let file: TaskFile = serde_json::from_str(json)
            .map_err(|e| TaskError::MalformedPersistedState(e.to_string()))?;

        check_id(file.id)?;

        for tab in &file.tabs {
            if tab.url.is_empty() {
                continue;
            }
            Url::parse(&tab.url).map_err(|e| {
                TaskError::MalformedPersistedState(format!("invalid tab url {:?}: {}", tab.url, e))
            })?;
        }

        Ok(file)
    }

    /// Snapshot a task. Private tabs are left out.
    pub fn from_task(task: &Task) -> Self {
        let tabs: Vec<TabRecord> = task
            .tabs()
            .iter()
            .filter(|t| !t.private)
            .map(TabRecord::from_tab)
            .collect();

        let selected_tab = task
            .selected_tab()
            .filter(|id| tabs.iter().any(|t| t.id.as_ref() == Some(*id)))
            .cloned();

        Self {
            id: task.id,
            name: task.name.clone(),
            collapsed: task.collapsed,
            tabs,
            selected_tab,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The next id after a restored task has to stay representable
fn check_id(id: TaskId) -> Result<()> {
    match id.0.checked_add(1) {
        Some(_) => Ok(()),
        None => Err(TaskError::MalformedPersistedState(format!(
            "task id {} is out of range",
            id
        ))),
    }
}

/// Outcome of restoring a task file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restored {
    pub task_id: TaskId,
    /// False when a task with the file's id was already open
    pub created: bool,
}

impl TaskStore {
    /// Bring a task file's task into the store and select it. A task whose
    /// id is already open is selected as it is, without merging the file.
    pub fn restore(&mut self, file: TaskFile) -> Result<Restored> {
        if self.get(file.id).is_some() {
            tracing::debug!(task_id = %file.id, "Task already open");
            self.set_selected(file.id)?;
            return Ok(Restored {
                task_id: file.id,
                created: false,
            });
        }

        check_id(file.id)?;

        let skipped = file.tabs.iter().filter(|t| t.private).count();
        let mut selected_tab = None;
        let mut seen = HashSet::new();
        let mut tabs = Vec::new();

        for record in file.tabs.into_iter().filter(|t| !t.private) {
            let original = record.id.clone();
            let mut tab = record.into_tab();

            // Tab ids are unique across the store; a clash keeps the page
            // under a fresh id
            if self.tab(&tab.id).is_some() || seen.contains(&tab.id) {
                let fresh = TabId::generate();
                tracing::debug!(
                    task_id = %file.id,
                    tab_id = %tab.id,
                    new_id = %fresh,
                    "Renaming clashing tab"
                );
                tab.id = fresh;
            }
            seen.insert(tab.id.clone());

            if selected_tab.is_none() && original.is_some() && original == file.selected_tab {
                selected_tab = Some(tab.id.clone());
            }
            tabs.push(tab);
        }

        let init = TaskInit {
            name: file.name,
            collapsed: file.collapsed,
            tabs,
            selected_tab,
        };
        let task_id = self.insert_task(file.id, init, None);
        self.set_selected(task_id)?;

        tracing::info!(task_id = %task_id, skipped_private = skipped, "Restored task");

        Ok(Restored {
            task_id,
            created: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use min_tabs::{NewTab, Placement};

    const SAVED: &str = r#"{
        "id": 42,
        "name": "Research",
        "tabs": [
            { "id": "a", "url": "https://example.com", "title": "Example", "lastActivity": 1700000000000 },
            { "id": "b", "url": "https://secret.example", "private": true },
            { "id": "c", "url": "" }
        ],
        "selectedTab": "c"
    }"#;

    #[test]
    fn test_parse_task_file() {
        let file = TaskFile::parse(SAVED).unwrap();
        assert_eq!(file.id, TaskId(42));
        assert_eq!(file.name.as_deref(), Some("Research"));
        assert!(!file.collapsed);
        assert_eq!(file.tabs.len(), 3);
        assert_eq!(
            file.tabs[0].last_activity,
            Some(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap())
        );
        assert_eq!(file.selected_tab, Some(TabId::from("c")));
    }

    #[test]
    fn test_parse_rejects_malformed_files() {
        for json in [
            "not json",
            r#"{ "tabs": [] }"#,
            r#"{ "id": 1 }"#,
            r#"{ "id": "one", "tabs": [] }"#,
            r#"{ "id": 1, "tabs": [{ "url": "not a url" }] }"#,
        ] {
            let err = TaskFile::parse(json).unwrap_err();
            assert!(
                matches!(err, TaskError::MalformedPersistedState(_)),
                "{json} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_restore_skips_private_tabs() {
        let mut store = TaskStore::default();
        let restored = store.restore(TaskFile::parse(SAVED).unwrap()).unwrap();

        assert!(restored.created);
        assert_eq!(restored.task_id, TaskId(42));
        assert_eq!(store.selected_id(), TaskId(42));

        let task = store.get(TaskId(42)).unwrap();
        assert_eq!(task.tabs().ids(), vec![TabId::from("a"), TabId::from("c")]);
        assert_eq!(task.selected_tab(), Some(&TabId::from("c")));
        assert_eq!(
            store.tab(&TabId::from("a")).unwrap().last_activity,
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
        );
        store.assert_invariants();
    }

    #[test]
    fn test_restore_only_private_tabs_gets_blank_tab() {
        let mut store = TaskStore::default();
        let file = TaskFile::parse(
            r#"{ "id": 7, "tabs": [{ "url": "https://secret.example", "private": true }] }"#,
        )
        .unwrap();

        store.restore(file).unwrap();
        let task = store.get(TaskId(7)).unwrap();
        assert_eq!(task.tabs().count(), 1);
        assert!(task.tabs().iter().all(|t| t.is_blank() && !t.private));
        store.assert_invariants();
    }

    #[test]
    fn test_restore_existing_id_selects_it() {
        let mut store = TaskStore::default();
        let existing = store.selected_id();
        let other = store.add(TaskInit::default(), None);
        store.set_selected(other).unwrap();

        let file = TaskFile {
            id: existing,
            name: Some("Ignored".to_string()),
            collapsed: false,
            tabs: Vec::new(),
            selected_tab: None,
        };
        let restored = store.restore(file).unwrap();

        assert!(!restored.created);
        assert_eq!(store.len(), 2);
        assert_eq!(store.selected_id(), existing);
        assert!(store.get(existing).unwrap().name.is_none());
    }

    #[test]
    fn test_largest_task_id_is_rejected() {
        let json = format!(r#"{{ "id": {}, "tabs": [] }}"#, u64::MAX);
        let err = TaskFile::parse(&json).unwrap_err();
        assert!(matches!(err, TaskError::MalformedPersistedState(_)));

        let mut store = TaskStore::default();
        let file = TaskFile {
            id: TaskId(u64::MAX),
            name: None,
            collapsed: false,
            tabs: Vec::new(),
            selected_tab: None,
        };
        let err = store.restore(file).unwrap_err();
        assert!(matches!(err, TaskError::MalformedPersistedState(_)));
        assert_eq!(store.len(), 1);

        let json = format!(r#"{{ "id": {}, "tabs": [] }}"#, u64::MAX - 1);
        store.restore(TaskFile::parse(&json).unwrap()).unwrap();
        store.assert_invariants();
    }

    #[test]
    fn test_restore_keeps_tabs_already_open_elsewhere() {
        let mut store = TaskStore::default();
        let owner = store.selected_id();
        let open = store
            .add_tab(owner, NewTab::with_url("https://a.example"), Placement::End)
            .unwrap();

        let json = format!(
            r#"{{
                "id": 50,
                "tabs": [
                    {{ "id": "{}", "url": "https://a.example", "title": "A" }},
                    {{ "id": "z", "url": "https://z.example" }}
                ],
                "selectedTab": "{}"
            }}"#,
            open, open
        );
        store.restore(TaskFile::parse(&json).unwrap()).unwrap();

        let task = store.get(TaskId(50)).unwrap();
        let urls: Vec<&str> = task.tabs().iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.example", "https://z.example"]);

        let copy = task.tabs().at_index(0).unwrap();
        assert_ne!(copy.id, open);
        assert_eq!(copy.title, "A");
        assert_eq!(task.selected_tab(), Some(&copy.id));

        // The original tab stays where it was
        assert_eq!(store.task_containing_tab(&open).unwrap().id, owner);
        store.assert_invariants();
    }

    #[test]
    fn test_restore_keeps_repeated_tab_ids() {
        let mut store = TaskStore::default();
        let file = TaskFile::parse(
            r#"{
                "id": 9,
                "tabs": [
                    { "id": "x", "url": "https://one.example" },
                    { "id": "x", "url": "https://two.example" }
                ],
                "selectedTab": "x"
            }"#,
        )
        .unwrap();
        store.restore(file).unwrap();

        let task = store.get(TaskId(9)).unwrap();
        let urls: Vec<&str> = task.tabs().iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, vec!["https://one.example", "https://two.example"]);
        assert_eq!(task.tabs().at_index(0).unwrap().id, TabId::from("x"));
        assert_eq!(task.selected_tab(), Some(&TabId::from("x")));
        store.assert_invariants();
    }

    #[test]
    fn test_restored_ids_do_not_collide() {
        let mut store = TaskStore::default();
        store.restore(TaskFile::parse(SAVED).unwrap()).unwrap();

        let next = store.add(TaskInit::default(), None);
        assert!(next > TaskId(42));
    }

    #[test]
    fn test_from_task_leaves_out_private_tabs() {
        let mut store = TaskStore::default();
        let task_id = store.selected_id();
        store.rename_task(task_id, "Shopping").unwrap();
        let public = store.selected_tab().unwrap().id.clone();
        let private = store
            .add_tab(task_id, NewTab::private(), Placement::End)
            .unwrap();
        store.select_tab(task_id, &private).unwrap();

        let file = TaskFile::from_task(store.get(task_id).unwrap());
        assert_eq!(file.name.as_deref(), Some("Shopping"));
        assert_eq!(file.tabs.len(), 1);
        assert_eq!(file.tabs[0].id, Some(public));
        assert!(file.selected_tab.is_none());

        // Timestamps are stored with millisecond precision
        let reparsed = TaskFile::parse(&file.to_json().unwrap()).unwrap();
        assert_eq!(reparsed.id, file.id);
        assert_eq!(reparsed.tabs[0].id, file.tabs[0].id);
        assert_eq!(
            reparsed.tabs[0].last_activity.map(|t| t.timestamp_millis()),
            file.tabs[0].last_activity.map(|t| t.timestamp_millis())
        );
    }
}
