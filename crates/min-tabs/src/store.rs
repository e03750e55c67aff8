//! Tab Store
//!
//! Ordered tabs of a single task plus the id of the selected one.

use serde::{Deserialize, Serialize};

use crate::error::TabError;
use crate::tab::{NewTab, Tab, TabId, TabUpdate};
use crate::Result;

/// Where a tab goes when it is added to a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    #[default]
    End,
    /// Position in display order, clamped to the store length
    Index(usize),
}

#[derive(Debug, Clone, Default)]
pub struct TabStore {
    tabs: Vec<Tab>,
    selected: Option<TabId>,
}

impl TabStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tab with a fresh id. The first tab of a store becomes selected.
    pub fn add(&mut self, init: NewTab, placement: Placement) -> TabId {
        let tab = Tab::new(init);
        let id = tab.id.clone();
        self.place(tab, placement);

        tracing::debug!(tab_id = %id, "Created tab");

        id
    }

    /// Insert an existing tab, keeping its identity
    pub fn insert(&mut self, tab: Tab, placement: Placement) -> Result<TabId> {
        if self.contains(&tab.id) {
            return Err(TabError::AlreadyExists(tab.id));
        }

        let id = tab.id.clone();
        self.place(tab, placement);
        Ok(id)
    }

    fn place(&mut self, tab: Tab, placement: Placement) {
        let index = match placement {
            Placement::End => self.tabs.len(),
            Placement::Index(index) => index.min(self.tabs.len()),
        };

        if self.tabs.is_empty() {
            self.selected = Some(tab.id.clone());
        }
        self.tabs.insert(index, tab);
    }

    pub fn get(&self, id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TabId) -> bool {
        self.get(id).is_some()
    }

    pub fn get_index(&self, id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| &t.id == id)
    }

    pub fn at_index(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tab> {
        self.tabs.iter()
    }

    pub fn ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Remove a tab and hand it back. When the removed tab was selected the
    /// selection moves to the next tab, then the previous one, then nothing.
    pub fn destroy(&mut self, id: &TabId) -> Option<Tab> {
        let index = self.get_index(id)?;
        let tab = self.tabs.remove(index);

        if self.selected.as_ref() == Some(id) {
            self.selected = self
                .tabs
                .get(index)
                .or_else(|| index.checked_sub(1).and_then(|i| self.tabs.get(i)))
                .map(|t| t.id.clone());
        }

        Some(tab)
    }

    /// Select a tab. Re-selecting the selected tab leaves the store untouched.
    pub fn set_selected(&mut self, id: &TabId) -> Result<()> {
        if self.selected.as_ref() == Some(id) {
            return Ok(());
        }

        let tab = self
            .tabs
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| TabError::InvalidReference(id.clone()))?;
        tab.touch();
        self.selected = Some(id.clone());

        tracing::debug!(tab_id = %id, "Selected tab");

        Ok(())
    }

    /// Select a tab without recording activity, for selections carried over
    /// from another store or from a saved task
    pub fn restore_selection(&mut self, id: &TabId) -> Result<()> {
        if !self.contains(id) {
            return Err(TabError::InvalidReference(id.clone()));
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    pub fn selected(&self) -> Option<&TabId> {
        self.selected.as_ref()
    }

    pub fn selected_tab(&self) -> Option<&Tab> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn update(&mut self, id: &TabId, update: TabUpdate) -> Result<()> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| TabError::NotFound(id.clone()))?;
        tab.apply(update);
        Ok(())
    }

    /// Most recently active first; ties keep their current order
    pub fn sort_by_activity(&mut self) {
        self.tabs.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    }
}

impl<'a> IntoIterator for &'a TabStore {
    type Item = &'a Tab;
    type IntoIter = std::slice::Iter<'a, Tab>;

    fn into_iter(self) -> Self::IntoIter {
        self.tabs.iter()
    }
}
