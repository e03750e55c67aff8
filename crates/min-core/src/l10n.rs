//! Localized UI strings

use std::collections::HashMap;

/// English strings for every key the core asks for
const ENGLISH: &[(&str, &str)] = &[
    ("defaultTaskName", "Task %n"),
    ("switchToTask", "Switch to task"),
    ("moveToTask", "Move this tab to a task"),
    ("moveToTaskFollow", "Move this tab to a task and switch to it"),
    ("createTask", "Create a task"),
    ("closeTask", "Close a task"),
    ("nameTask", "Name this task"),
    ("sortTabsByTime", "Sort tabs by time"),
    ("findPlayingTabs", "Find tabs that are playing audio"),
    ("noPlayingTabs", "No tabs are currently playing audio."),
    ("isFocusMode", "You're in focus mode."),
];

pub trait Localizer: Send + Sync {
    /// The string for `key`, or the key itself when it has no translation
    fn translate(&self, key: &str) -> String;

    /// Translate and substitute `%n`
    fn translate_n(&self, key: &str, n: usize) -> String {
        self.translate(key).replace("%n", &n.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct StaticLocalizer {
    strings: HashMap<String, String>,
}

impl StaticLocalizer {
    pub fn english() -> Self {
        Self {
            strings: ENGLISH
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Replace or add a string
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(key.into(), value.into());
        self
    }
}

impl Default for StaticLocalizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Localizer for StaticLocalizer {
    fn translate(&self, key: &str) -> String {
        match self.strings.get(key) {
            Some(value) => value.clone(),
            None => {
                tracing::debug!(key, "Missing translation");
                key.to_string()
            }
        }
    }
}
