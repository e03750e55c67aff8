//! Search-bar bang commands
//!
//! A bang is a `!phrase` typed into the search bar, optionally followed by an
//! argument: `!movetotask reading list`. Phrases are looked up in a
//! [`BangRegistry`]; anything that is not a registered bang is plain search
//! text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SearchError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BangKind {
    /// Switch to the best matching task, or show the task overlay
    Task,
    /// Move the current tab to a task
    MoveToTask,
    /// Move the current tab to a task and switch to it
    MoveToTaskFollow,
    /// Create a task, optionally named
    NewTask,
    /// Close a task by name or number, or the current one
    CloseTask,
    /// Rename the current task
    NameTask,
    /// Order the current task's tabs by recent activity
    Sort,
    /// Find tabs that are playing audio
    Playing,
}

/// A registered bang
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BangDef {
    pub phrase: String,
    pub kind: BangKind,
    /// Localization key of the suggestion text
    pub snippet_key: String,
    /// Actions run as soon as they are picked, without an argument
    pub is_action: bool,
}

impl BangDef {
    pub fn new(phrase: &str, kind: BangKind, snippet_key: &str, is_action: bool) -> Self {
        Self {
            phrase: phrase.to_lowercase(),
            kind,
            snippet_key: snippet_key.to_string(),
            is_action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BangInvocation {
    pub kind: BangKind,
    pub phrase: String,
    /// Text after the phrase, trimmed; empty when absent
    pub argument: String,
}

#[derive(Debug, Clone, Default)]
pub struct BangRegistry {
    bangs: BTreeMap<String, BangDef>,
}

impl BangRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the task and tab bangs
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults = [
            BangDef::new("!task", BangKind::Task, "switchToTask", false),
            BangDef::new("!movetotask", BangKind::MoveToTask, "moveToTask", false),
            BangDef::new(
                "!movetotaskfollow",
                BangKind::MoveToTaskFollow,
                "moveToTaskFollow",
                false,
            ),
            BangDef::new("!newtask", BangKind::NewTask, "createTask", false),
            BangDef::new("!closetask", BangKind::CloseTask, "closeTask", false),
            BangDef::new("!nametask", BangKind::NameTask, "nameTask", false),
            BangDef::new("!sort", BangKind::Sort, "sortTabsByTime", true),
            BangDef::new("!playing", BangKind::Playing, "findPlayingTabs", false),
        ];

        for def in defaults {
            registry.bangs.insert(def.phrase.clone(), def);
        }
        registry
    }

    /// Register a bang. A phrase that is already registered is replaced.
    pub fn register(&mut self, def: BangDef) -> Result<()> {
        let valid = def.phrase.len() > 1
            && def.phrase.starts_with('!')
            && !def.phrase.chars().any(char::is_whitespace);
        if !valid {
            return Err(SearchError::InvalidPhrase(def.phrase));
        }

        if let Some(previous) = self.bangs.insert(def.phrase.clone(), def) {
            tracing::debug!(phrase = %previous.phrase, "Replaced bang");
        }
        Ok(())
    }

    pub fn lookup(&self, phrase: &str) -> Result<&BangDef> {
        self.bangs
            .get(&phrase.to_lowercase())
            .ok_or_else(|| SearchError::UnknownBang(phrase.to_string()))
    }

    /// Bangs whose phrase starts with the typed text, for the suggestion list
    pub fn suggestions(&self, typed: &str) -> Vec<&BangDef> {
        let typed = typed.trim().to_lowercase();
        self.bangs
            .values()
            .filter(|def| def.phrase.starts_with(&typed))
            .collect()
    }

    /// Parse search-bar text. `None` when the text is not a registered bang.
    pub fn parse(&self, input: &str) -> Option<BangInvocation> {
        let input = input.trim_start();
        if !input.starts_with('!') {
            return None;
        }

        let (phrase, rest) = match input.find(char::is_whitespace) {
            Some(idx) => input.split_at(idx),
            None => (input, ""),
        };

        match self.lookup(phrase) {
            Ok(def) => Some(BangInvocation {
                kind: def.kind,
                phrase: def.phrase.clone(),
                argument: rest.trim().to_string(),
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unregistered bang");
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bangs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bangs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_argument() {
        let registry = BangRegistry::with_defaults();

        let bang = registry.parse("!movetotask  Reading List ").unwrap();
        assert_eq!(bang.kind, BangKind::MoveToTask);
        assert_eq!(bang.argument, "Reading List");

        let bang = registry.parse("!task").unwrap();
        assert_eq!(bang.kind, BangKind::Task);
        assert!(bang.argument.is_empty());
    }

    #[test]
    fn test_phrase_is_case_insensitive() {
        let registry = BangRegistry::with_defaults();
        let bang = registry.parse("!NewTask work").unwrap();
        assert_eq!(bang.kind, BangKind::NewTask);
        assert_eq!(bang.phrase, "!newtask");
    }

    #[test]
    fn test_longer_phrase_is_not_confused_with_prefix() {
        let registry = BangRegistry::with_defaults();
        let bang = registry.parse("!movetotaskfollow 2").unwrap();
        assert_eq!(bang.kind, BangKind::MoveToTaskFollow);
        assert_eq!(bang.argument, "2");
    }

    #[test]
    fn test_not_a_bang() {
        let registry = BangRegistry::with_defaults();
        assert!(registry.parse("rust programming").is_none());
        assert!(registry.parse("!unknown thing").is_none());
        assert!(registry.parse("!settings").is_none());
    }

    #[test]
    fn test_register_validates_phrase() {
        let mut registry = BangRegistry::new();
        let err = registry
            .register(BangDef::new("task", BangKind::Task, "switchToTask", false))
            .unwrap_err();
        assert_eq!(err, SearchError::InvalidPhrase("task".to_string()));

        assert!(registry
            .register(BangDef::new("!t", BangKind::Task, "switchToTask", false))
            .is_ok());
        assert_eq!(registry.parse("!t 3").unwrap().argument, "3");
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = BangRegistry::with_defaults();
        let count = registry.len();

        registry
            .register(BangDef::new("!sort", BangKind::Sort, "sortTabs", false))
            .unwrap();

        assert_eq!(registry.len(), count);
        assert!(!registry.lookup("!sort").unwrap().is_action);
    }

    #[test]
    fn test_suggestions() {
        let registry = BangRegistry::with_defaults();
        let phrases: Vec<&str> = registry
            .suggestions("!move")
            .into_iter()
            .map(|d| d.phrase.as_str())
            .collect();
        assert_eq!(phrases, vec!["!movetotask", "!movetotaskfollow"]);
    }
}
