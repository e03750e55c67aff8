//! Moving tabs between tasks
//!
//! A move validates everything it needs before touching the store, so a
//! failed move leaves the store exactly as it was. The tab keeps its id,
//! URL, title and activity; only its owning task changes.

use serde::{Deserialize, Serialize};

use min_tabs::{NewTab, Placement, TabId};

use crate::error::TaskError;
use crate::store::TaskStore;
use crate::task::{TaskId, TaskInit};
use crate::Result;

/// Where a moved tab should end up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    /// An existing task; fails with `TaskNotFound` if it is gone
    Task(TaskId),
    /// The task with this name, created next to the selected task if none matches
    Named(String),
    /// Always a new task, created next to the selected task
    New { name: Option<String> },
}

/// Outcome of a move, for updating window-level selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moved {
    pub tab_id: TabId,
    pub task_id: TaskId,
    pub created_task: bool,
    /// Blank tab put into the source task because the move emptied it
    pub refilled_source: Option<TabId>,
}

enum Target {
    Existing(TaskId),
    Create(Option<String>),
}

impl TaskStore {
    /// Move a tab into another task and select it there
    pub fn move_tab(
        &mut self,
        tab_id: &TabId,
        destination: Destination,
        placement: Placement,
    ) -> Result<Moved> {
        let source_id = self
            .task_containing_tab(tab_id)
            .map(|t| t.id)
            .ok_or_else(|| TaskError::TabNotFound(tab_id.clone()))?;

        let target = match destination {
            Destination::Task(id) => {
                self.get(id).ok_or(TaskError::TaskNotFound(id))?;
                Target::Existing(id)
            }
            Destination::Named(name) => match self.find_by_name(&name) {
                Some(task) => Target::Existing(task.id),
                None => Target::Create(Some(name)),
            },
            Destination::New { name } => Target::Create(name),
        };

        if let Target::Existing(id) = target {
            if id == source_id {
                return self.reposition(source_id, tab_id, placement);
            }
        }

        let source = self
            .task_mut(source_id)
            .ok_or(TaskError::TaskNotFound(source_id))?;
        let tab = source
            .tabs
            .destroy(tab_id)
            .ok_or_else(|| TaskError::TabNotFound(tab_id.clone()))?;
        let refilled_source = source
            .tabs
            .is_empty()
            .then(|| source.tabs.add(NewTab::default(), Placement::End));

        let (task_id, created_task) = match target {
            Target::Existing(id) => {
                let destination = self.task_mut(id).ok_or(TaskError::TaskNotFound(id))?;
                destination.tabs.insert(tab, placement)?;
                destination.tabs.restore_selection(tab_id)?;
                (id, false)
            }
            Target::Create(name) => {
                let index = self.get_index(self.selected_id()).map(|i| i + 1);
                let init = TaskInit {
                    name,
                    tabs: vec![tab],
                    selected_tab: Some(tab_id.clone()),
                    ..TaskInit::default()
                };
                (self.add(init, index), true)
            }
        };

        tracing::info!(
            tab_id = %tab_id,
            from = %source_id,
            to = %task_id,
            created_task,
            "Moved tab"
        );

        Ok(Moved {
            tab_id: tab_id.clone(),
            task_id,
            created_task,
            refilled_source,
        })
    }

    /// Move a tab and switch to the task it landed in
    pub fn move_tab_and_follow(
        &mut self,
        tab_id: &TabId,
        destination: Destination,
        placement: Placement,
    ) -> Result<Moved> {
        let moved = self.move_tab(tab_id, destination, placement)?;
        self.set_selected(moved.task_id)?;
        Ok(moved)
    }

    fn reposition(&mut self, task_id: TaskId, tab_id: &TabId, placement: Placement) -> Result<Moved> {
        let task = self
            .task_mut(task_id)
            .ok_or(TaskError::TaskNotFound(task_id))?;
        let tab = task
            .tabs
            .destroy(tab_id)
            .ok_or_else(|| TaskError::TabNotFound(tab_id.clone()))?;
        task.tabs.insert(tab, placement)?;
        task.tabs.restore_selection(tab_id)?;

        Ok(Moved {
            tab_id: tab_id.clone(),
            task_id,
            created_task: false,
            refilled_source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use min_tabs::TabUpdate;

    #[test]
    fn test_move_to_missing_named_task_creates_it() {
        let mut store = TaskStore::default();
        let t0 = store.selected_id();
        let a = store.selected_tab().unwrap().id.clone();

        let moved = store
            .move_tab_and_follow(&a, Destination::Named("T1".to_string()), Placement::End)
            .unwrap();

        assert!(moved.created_task);
        assert_eq!(store.len(), 2);

        let t1 = moved.task_id;
        assert_eq!(store.printed_name(t1).as_deref(), Some("T1"));
        assert_eq!(store.get(t1).unwrap().tabs().ids(), vec![a.clone()]);

        let b = moved.refilled_source.clone().unwrap();
        assert_ne!(b, a);
        assert_eq!(store.get(t0).unwrap().tabs().ids(), vec![b]);

        assert_eq!(store.selected_id(), t1);
        assert_eq!(store.get(t1).unwrap().selected_tab(), Some(&a));
        store.assert_invariants();
    }

    #[test]
    fn test_move_without_follow_keeps_task_selection() {
        let mut store = TaskStore::default();
        let t0 = store.selected_id();
        let a = store.selected_tab().unwrap().id.clone();

        let moved = store
            .move_tab(&a, Destination::New { name: None }, Placement::End)
            .unwrap();

        assert_eq!(store.selected_id(), t0);
        assert_eq!(store.get_index(moved.task_id), Some(1));
        store.assert_invariants();
    }

    #[test]
    fn test_move_preserves_tab_identity() {
        let mut store = TaskStore::default();
        let source = store.selected_id();
        let tab_id = store
            .add_tab(source, NewTab::with_url("https://example.com"), Placement::End)
            .unwrap();
        store
            .update_tab(
                &tab_id,
                TabUpdate {
                    title: Some("Example".to_string()),
                    ..TabUpdate::default()
                },
            )
            .unwrap();
        let before = store.tab(&tab_id).unwrap().clone();

        let destination = store.add(TaskInit::named("Reading"), None);
        let moved = store
            .move_tab(&tab_id, Destination::Task(destination), Placement::End)
            .unwrap();

        assert_eq!(moved.task_id, destination);
        assert!(!moved.created_task);
        assert!(moved.refilled_source.is_none());
        assert_eq!(store.tab(&tab_id), Some(&before));
        assert_eq!(store.task_containing_tab(&tab_id).unwrap().id, destination);
        assert_eq!(store.get(destination).unwrap().selected_tab(), Some(&tab_id));
        assert_eq!(store.get(source).unwrap().tabs().count(), 1);
        store.assert_invariants();
    }

    #[test]
    fn test_move_to_existing_named_task_is_case_insensitive() {
        let mut store = TaskStore::default();
        let reading = store.add(TaskInit::named("Reading"), None);
        let tab_id = store.selected_tab().unwrap().id.clone();

        let moved = store
            .move_tab(&tab_id, Destination::Named("reading".to_string()), Placement::Index(0))
            .unwrap();

        assert_eq!(moved.task_id, reading);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(reading).unwrap().tabs().ids()[0], tab_id);
    }

    #[test]
    fn test_failed_move_changes_nothing() {
        let mut store = TaskStore::default();
        let tab_id = store.selected_tab().unwrap().id.clone();
        let tasks_before = store.ids();

        let err = store
            .move_tab(&tab_id, Destination::Task(TaskId(999)), Placement::End)
            .unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound(TaskId(999))));
        assert_eq!(store.ids(), tasks_before);
        assert_eq!(store.selected_tab().unwrap().id, tab_id);

        let err = store
            .move_tab(&TabId::from("missing"), Destination::New { name: None }, Placement::End)
            .unwrap_err();
        assert!(matches!(err, TaskError::TabNotFound(_)));
        assert_eq!(store.ids(), tasks_before);
        store.assert_invariants();
    }

    #[test]
    fn test_move_within_same_task_repositions() {
        let mut store = TaskStore::default();
        let task_id = store.selected_id();
        let first = store.selected_tab().unwrap().id.clone();
        let second = store
            .add_tab(task_id, NewTab::default(), Placement::End)
            .unwrap();

        let moved = store
            .move_tab(&first, Destination::Task(task_id), Placement::End)
            .unwrap();

        assert!(moved.refilled_source.is_none());
        let task = store.get(task_id).unwrap();
        assert_eq!(task.tabs().ids(), vec![second, first.clone()]);
        assert_eq!(task.selected_tab(), Some(&first));
        store.assert_invariants();
    }
}
