//! Task Store
//!
//! Ordered tasks in display order plus the selected task. Every mutation
//! that could leave a task without tabs goes through the store, which puts a
//! blank tab back before returning.

use chrono::{DateTime, Utc};

use min_tabs::{NewTab, Placement, Tab, TabId, TabUpdate};

use crate::error::TaskError;
use crate::task::{Task, TaskId, TaskInit};
use crate::Result;

/// Name template for tasks without a name, `%n` is the 1-based position
pub const DEFAULT_NAME_TEMPLATE: &str = "Task %n";

#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    selected: TaskId,
    next_id: u64,
    name_template: String,
}

impl TaskStore {
    /// Create a store holding a single blank task
    pub fn new(name_template: impl Into<String>) -> Self {
        let mut store = Self {
            tasks: Vec::new(),
            selected: TaskId(0),
            next_id: 1,
            name_template: name_template.into(),
        };
        store.selected = store.add(TaskInit::default(), None);
        store
    }

    /// Add a task at `index` (default: the end). A task without tabs gets
    /// one blank tab.
    pub fn add(&mut self, init: TaskInit, index: Option<usize>) -> TaskId {
        let id = TaskId(self.next_id);
        self.insert_task(id, init, index)
    }

    pub(crate) fn insert_task(&mut self, id: TaskId, init: TaskInit, index: Option<usize>) -> TaskId {
        self.next_id = self.next_id.max(id.0.saturating_add(1));

        let mut task = Task::new(id, init.name, init.collapsed);
        for tab in init.tabs {
            if let Some(owner) = self.task_containing_tab(&tab.id) {
                tracing::warn!(
                    task_id = %id,
                    tab_id = %tab.id,
                    owner = %owner.id,
                    "Skipping tab that already belongs to another task"
                );
                continue;
            }
            if let Err(e) = task.tabs.insert(tab, Placement::End) {
                tracing::warn!(task_id = %id, error = %e, "Skipping duplicate tab");
            }
        }

        if task.tabs.is_empty() {
            task.tabs.add(NewTab::default(), Placement::End);
        }

        if let Some(selected) = init.selected_tab {
            if let Err(e) = task.tabs.restore_selection(&selected) {
                tracing::debug!(task_id = %id, error = %e, "Keeping default tab selection");
            }
        }

        let index = index.unwrap_or(self.tasks.len()).min(self.tasks.len());
        self.tasks.insert(index, task);

        tracing::info!(task_id = %id, index, "Created task");

        id
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub(crate) fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Position in display order
    pub fn get_index(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn at_index(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn selected(&self) -> &Task {
        match self.get(self.selected) {
            Some(task) => task,
            None => &self.tasks[0],
        }
    }

    pub fn selected_id(&self) -> TaskId {
        self.selected().id
    }

    /// The selected tab of the selected task
    pub fn selected_tab(&self) -> Option<&Tab> {
        self.selected().tabs.selected_tab()
    }

    /// Select a task. Re-selecting the selected task changes nothing.
    pub fn set_selected(&mut self, id: TaskId) -> Result<()> {
        if id == self.selected {
            return Ok(());
        }

        let task = self.task_mut(id).ok_or(TaskError::TaskNotFound(id))?;
        task.touch();
        self.selected = id;

        tracing::debug!(task_id = %id, "Selected task");

        Ok(())
    }

    pub fn name_template(&self) -> &str {
        &self.name_template
    }

    /// The task's name, or the positional default name
    pub fn printed_name(&self, id: TaskId) -> Option<String> {
        let index = self.get_index(id)?;
        let task = &self.tasks[index];

        match task.name.as_deref() {
            Some(name) if !name.is_empty() => Some(name.to_string()),
            _ => Some(self.name_template.replace("%n", &(index + 1).to_string())),
        }
    }

    pub fn last_activity(&self, id: TaskId) -> Option<DateTime<Utc>> {
        self.get(id).map(Task::last_activity)
    }

    pub fn task_containing_tab(&self, tab_id: &TabId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.tabs.contains(tab_id))
    }

    pub fn tab(&self, tab_id: &TabId) -> Option<&Tab> {
        self.tasks.iter().find_map(|t| t.tabs.get(tab_id))
    }

    pub(crate) fn find_by_name(&self, name: &str) -> Option<&Task> {
        let name = name.trim().to_lowercase();
        self.tasks.iter().find(|t| {
            t.name
                .as_deref()
                .is_some_and(|n| n.to_lowercase() == name)
        })
    }

    /// `"2"` is the second task; anything that is not a positive number is matched
    /// against task names, case-insensitively.
    pub fn task_by_name_or_number(&self, text: &str) -> Option<&Task> {
        let text = text.trim();

        match text.parse::<usize>() {
            Ok(number) if number > 0 => self.tasks.get(number - 1),
            _ => self.find_by_name(text),
        }
    }

    /// Remove a task. Closing the last task leaves a fresh blank task behind;
    /// closing the selected task selects the previous task, or the next one.
    pub fn close_task(&mut self, id: TaskId) -> Result<Task> {
        let index = self.get_index(id).ok_or(TaskError::TaskNotFound(id))?;
        let task = self.tasks.remove(index);

        if self.tasks.is_empty() {
            self.selected = self.add(TaskInit::default(), None);
        } else if self.selected == id {
            let next = index
                .checked_sub(1)
                .and_then(|i| self.tasks.get(i))
                .or_else(|| self.tasks.get(index))
                .map(|t| t.id);

            if let Some(next) = next {
                self.selected = next;
                if let Some(next) = self.task_mut(next) {
                    next.touch();
                }
            }
        }

        tracing::info!(task_id = %id, tab_count = task.tabs.count(), "Closed task");

        Ok(task)
    }

    /// Set or clear (with a blank name) a task's name
    pub fn rename_task(&mut self, id: TaskId, name: &str) -> Result<()> {
        let task = self.task_mut(id).ok_or(TaskError::TaskNotFound(id))?;
        let name = name.trim();
        task.name = (!name.is_empty()).then(|| name.to_string());
        Ok(())
    }

    /// Flip the collapsed hint, returning the new value
    pub fn toggle_collapsed(&mut self, id: TaskId) -> Result<bool> {
        let task = self.task_mut(id).ok_or(TaskError::TaskNotFound(id))?;
        task.collapsed = !task.collapsed;
        Ok(task.collapsed)
    }

    pub fn add_tab(&mut self, task_id: TaskId, init: NewTab, placement: Placement) -> Result<TabId> {
        let task = self
            .task_mut(task_id)
            .ok_or(TaskError::TaskNotFound(task_id))?;
        Ok(task.tabs.add(init, placement))
    }

    /// Close a tab. A task left without tabs gets a blank one.
    pub fn destroy_tab(&mut self, tab_id: &TabId) -> Result<Tab> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.tabs.contains(tab_id))
            .ok_or_else(|| TaskError::TabNotFound(tab_id.clone()))?;

        let tab = task
            .tabs
            .destroy(tab_id)
            .ok_or_else(|| TaskError::TabNotFound(tab_id.clone()))?;

        if task.tabs.is_empty() {
            let blank = task.tabs.add(NewTab::default(), Placement::End);
            tracing::debug!(task_id = %task.id, tab_id = %blank, "Refilled empty task");
        }

        Ok(tab)
    }

    pub fn select_tab(&mut self, task_id: TaskId, tab_id: &TabId) -> Result<()> {
        let task = self
            .task_mut(task_id)
            .ok_or(TaskError::TaskNotFound(task_id))?;
        task.tabs.set_selected(tab_id)?;
        Ok(())
    }

    pub fn update_tab(&mut self, tab_id: &TabId, update: TabUpdate) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.tabs.contains(tab_id))
            .ok_or_else(|| TaskError::TabNotFound(tab_id.clone()))?;
        task.tabs.update(tab_id, update)?;
        Ok(())
    }

    /// Reorder a task's tabs, most recently active first
    pub fn sort_tabs_by_activity(&mut self, task_id: TaskId) -> Result<()> {
        let task = self
            .task_mut(task_id)
            .ok_or(TaskError::TaskNotFound(task_id))?;
        task.tabs.sort_by_activity();
        Ok(())
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_TEMPLATE)
    }
}

#[cfg(test)]
impl TaskStore {
    /// Panics if any store invariant is broken
    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        assert!(!self.tasks.is_empty(), "store is empty");
        assert!(self.get(self.selected).is_some(), "selected task missing");

        let mut seen = HashSet::new();
        for task in &self.tasks {
            assert!(task.tabs.count() >= 1, "task {} has no tabs", task.id);
            let selected = task.tabs.selected().expect("task without selected tab");
            assert!(task.tabs.contains(selected));
            for tab in task.tabs.iter() {
                assert!(seen.insert(tab.id.clone()), "tab {} owned twice", tab.id);
            }
        }
    }
}
