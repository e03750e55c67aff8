//! Main browser state container
//!
//! The [`Browser`] owns the task store and turns commands into store changes
//! plus the [`UiEffect`]s that go with them. It never drives a window itself.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

use min_search::{
    score, substring_match, BangDef, BangInvocation, BangKind, BangRegistry, DEFAULT_FUZZINESS,
};
use min_tabs::{NewTab, Placement, TabId, TabUpdate};
use min_tasks::{
    first_task_match, search_and_sort_tabs, search_and_sort_tasks, tabs_with_audio, Destination,
    TaskFile, TaskId, TaskInit, TaskMatch, TaskStore,
};

use crate::command::{AddTabPayload, Command, UiEffect};
use crate::config::Config;
use crate::l10n::{Localizer, StaticLocalizer};
use crate::modes::{Guard, Modes};
use crate::Result;

/// A task offered in the search bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSuggestion {
    pub task_id: TaskId,
    pub name: String,
    pub last_activity: DateTime<Utc>,
}

/// A bang offered in the search bar, with its localized description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BangSuggestion {
    pub phrase: String,
    pub snippet: String,
    pub is_action: bool,
}

/// Main browser instance
///
/// Holds the single task store of the session. Commands are guarded by the
/// modal/focus mode and applied to the store under one write lock each.
pub struct Browser {
    /// Configuration
    config: Config,
    /// All tasks and their tabs
    tasks: Arc<RwLock<TaskStore>>,
    /// Modal and focus mode flags
    modes: Arc<RwLock<Modes>>,
    /// Search-bar bangs
    bangs: Arc<RwLock<BangRegistry>>,
    localizer: Arc<dyn Localizer>,
}

impl Browser {
    pub fn new(config: Config) -> Self {
        Self::with_localizer(config, Arc::new(StaticLocalizer::english()))
    }

    pub fn with_localizer(config: Config, localizer: Arc<dyn Localizer>) -> Self {
        let name_template = localizer.translate("defaultTaskName");
        let tasks = TaskStore::new(name_template);

        tracing::info!(locale = %config.locale, "Browser initialized");

        Self {
            config,
            tasks: Arc::new(RwLock::new(tasks)),
            modes: Arc::new(RwLock::new(Modes::default())),
            bangs: Arc::new(RwLock::new(BangRegistry::with_defaults())),
            localizer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read access to the task store
    pub fn with_tasks<R>(&self, f: impl FnOnce(&TaskStore) -> R) -> R {
        f(&*self.tasks.read())
    }

    // === Modes ===

    pub fn set_modal_mode(&self, enabled: bool) {
        self.modes.write().modal = enabled;
    }

    pub fn set_focus_mode(&self, enabled: bool) {
        self.modes.write().focus = enabled;
        tracing::info!(enabled, "Focus mode changed");
    }

    pub fn modes(&self) -> Modes {
        *self.modes.read()
    }

    // === Commands ===

    /// Run a command. Commands refused by the mode guard change nothing.
    pub async fn dispatch(&self, command: Command) -> Result<Vec<UiEffect>> {
        if command.is_guarded() {
            let guard = self.modes.read().guard();
            match guard {
                Guard::Allow => {}
                Guard::Ignore => {
                    tracing::debug!(command = command.name(), "Ignoring command in modal mode");
                    return Ok(Vec::new());
                }
                Guard::Warn => {
                    tracing::debug!(command = command.name(), "Refusing command in focus mode");
                    return Ok(vec![UiEffect::FocusModeWarning]);
                }
            }
        }

        match command {
            Command::AddTab(payload) => self.add_tab(payload),
            Command::AddPrivateTab => self.add_private_tab(),
            Command::DuplicateTab => self.duplicate_tab(),
            Command::SwitchToTask(payload) => self.switch_to_task(&payload.task_query),
            Command::OpenTaskFile(payload) => self.open_task_file(&payload.file_path).await,
            Command::ToggleCollapsed => self.toggle_collapsed(),
            Command::ToggleTaskOverlay => Ok(vec![UiEffect::ToggleTaskOverlay]),
            Command::Bang(invocation) => self.run_bang(invocation),
        }
    }

    fn add_tab(&self, payload: AddTabPayload) -> Result<Vec<UiEffect>> {
        let mut tasks = self.tasks.write();
        let mut effects = Vec::new();
        let mut task_id = tasks.selected_id();

        if let Some(query) = payload.task_query.as_deref().filter(|q| !q.trim().is_empty()) {
            match tasks.task_by_name_or_number(query).map(|t| t.id) {
                Some(id) if id != task_id => {
                    tasks.set_selected(id)?;
                    effects.push(UiEffect::SwitchToTask(id));
                    task_id = id;
                }
                Some(_) => {}
                None => tracing::debug!(task_query = query, "No task matches, using current task"),
            }
        }

        let url = payload.url.unwrap_or_default();
        let enter_edit_mode = url.is_empty();
        let tab_id = open_tab(&mut tasks, task_id, NewTab::with_url(url))?;

        effects.push(UiEffect::AddTab {
            tab_id,
            enter_edit_mode,
        });
        Ok(effects)
    }

    fn add_private_tab(&self) -> Result<Vec<UiEffect>> {
        let mut tasks = self.tasks.write();
        let task_id = tasks.selected_id();
        let tab_id = open_tab(&mut tasks, task_id, NewTab::private())?;

        Ok(vec![UiEffect::AddTab {
            tab_id,
            enter_edit_mode: true,
        }])
    }

    fn duplicate_tab(&self) -> Result<Vec<UiEffect>> {
        let mut tasks = self.tasks.write();
        let task_id = tasks.selected_id();
        let Some(source) = tasks.selected_tab().cloned() else {
            return Ok(Vec::new());
        };

        let init = NewTab {
            url: source.url,
            private: source.private,
        };
        let tab_id = open_tab(&mut tasks, task_id, init)?;
        tasks.update_tab(
            &tab_id,
            TabUpdate {
                title: Some(source.title),
                ..TabUpdate::default()
            },
        )?;

        Ok(vec![UiEffect::DuplicateTab(tab_id)])
    }

    /// Switch by task name or 1-based number
    fn switch_to_task(&self, query: &str) -> Result<Vec<UiEffect>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut tasks = self.tasks.write();
        let Some(task_id) = tasks.task_by_name_or_number(query).map(|t| t.id) else {
            tracing::debug!(task_query = query, "No task to switch to");
            return Ok(Vec::new());
        };

        tasks.set_selected(task_id)?;
        Ok(vec![UiEffect::SwitchToTask(task_id)])
    }

    fn toggle_collapsed(&self) -> Result<Vec<UiEffect>> {
        let mut tasks = self.tasks.write();
        let task_id = tasks.selected_id();
        tasks.toggle_collapsed(task_id)?;
        Ok(vec![UiEffect::UpdateTaskName])
    }

    /// Read a task file and switch to its task. The store is only locked
    /// after the file has been read and validated.
    pub async fn open_task_file(&self, path: &Path) -> Result<Vec<UiEffect>> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read task file");
                return Err(e.into());
            }
        };

        let file = TaskFile::parse(&contents).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Skipping malformed task file");
            e
        })?;

        let restored = self.tasks.write().restore(file)?;
        Ok(vec![UiEffect::SwitchToTask(restored.task_id)])
    }

    /// Serialize a task for saving to a task file
    pub fn export_task(&self, task_id: TaskId) -> Result<String> {
        let tasks = self.tasks.read();
        let task = tasks
            .get(task_id)
            .ok_or(min_tasks::TaskError::TaskNotFound(task_id))?;
        Ok(TaskFile::from_task(task).to_json()?)
    }

    // === Tabs reported by the window ===

    /// Apply page state (url, title, audio) reported by the tab's view
    pub fn update_tab(&self, tab_id: &TabId, update: TabUpdate) -> Result<()> {
        self.tasks.write().update_tab(tab_id, update)?;
        Ok(())
    }

    pub fn close_tab(&self, tab_id: &TabId) -> Result<()> {
        self.tasks.write().destroy_tab(tab_id)?;
        tracing::debug!(tab_id = %tab_id, "Closed tab");
        Ok(())
    }

    // === Search bar ===

    /// The command for search-bar text, when it is a registered bang
    pub fn parse_searchbar(&self, text: &str) -> Option<Command> {
        self.bangs.read().parse(text).map(Command::Bang)
    }

    pub fn register_bang(&self, def: BangDef) -> Result<()> {
        self.bangs.write().register(def)?;
        Ok(())
    }

    pub fn bang_suggestions(&self, text: &str) -> Vec<BangSuggestion> {
        let text = text.trim_start();
        if !text.starts_with('!') {
            return Vec::new();
        }

        let phrase = text.split_whitespace().next().unwrap_or_default();
        let bangs = self.bangs.read();
        bangs
            .suggestions(phrase)
            .into_iter()
            .map(|def| BangSuggestion {
                phrase: def.phrase.clone(),
                snippet: self.localizer.translate(&def.snippet_key),
                is_action: def.is_action,
            })
            .collect()
    }

    /// Tasks to offer for search-bar text, other than the current one.
    /// A number lists every task by recency; other text is ranked by how well
    /// it matches the task name.
    pub fn task_suggestions(&self, text: &str) -> Vec<TaskSuggestion> {
        let text = text.trim().to_lowercase();
        if text.chars().count() < self.config.task_suggestion_min_chars {
            return Vec::new();
        }

        let tasks = self.tasks.read();
        let is_number = text.chars().all(|c| c.is_ascii_digit());

        let mut matches = if is_number {
            search_and_sort_tasks(&tasks, "", true)
        } else {
            search_and_sort_tasks(&tasks, &text, true)
        };

        if !is_number {
            let relevance = |m: &TaskMatch| {
                let name = tasks
                    .printed_name(m.task_id)
                    .unwrap_or_default()
                    .to_lowercase();
                let exact = if substring_match(&name, &text) { 1.0 } else { 0.0 };
                score(&name, &text, DEFAULT_FUZZINESS) + exact
            };
            matches.sort_by(|a, b| relevance(b).total_cmp(&relevance(a)));
        }

        matches
            .into_iter()
            .filter_map(|m| {
                Some(TaskSuggestion {
                    name: tasks.printed_name(m.task_id)?,
                    task_id: m.task_id,
                    last_activity: m.last_activity,
                })
            })
            .collect()
    }

    // === Bangs ===

    fn run_bang(&self, invocation: BangInvocation) -> Result<Vec<UiEffect>> {
        let text = invocation.argument.trim();

        tracing::debug!(phrase = %invocation.phrase, argument = text, "Running bang");

        match invocation.kind {
            BangKind::Task => self.bang_switch_task(text),
            BangKind::MoveToTask => self.bang_move_to_task(text, false),
            BangKind::MoveToTaskFollow => self.bang_move_to_task(text, true),
            BangKind::NewTask => self.bang_new_task(text),
            BangKind::CloseTask => self.bang_close_task(text),
            BangKind::NameTask => self.bang_name_task(text),
            BangKind::Sort => self.bang_sort(),
            BangKind::Playing => self.bang_playing(text),
        }
    }

    fn bang_switch_task(&self, text: &str) -> Result<Vec<UiEffect>> {
        if text.is_empty() {
            return Ok(vec![UiEffect::ShowTaskOverlay]);
        }

        let mut tasks = self.tasks.write();
        match first_task_match(&tasks, text) {
            Some(task_id) => {
                tasks.set_selected(task_id)?;
                Ok(vec![UiEffect::SwitchToTask(task_id)])
            }
            None => Ok(vec![UiEffect::ShowTaskOverlay]),
        }
    }

    /// Move the current tab to the best matching task, or to a new task
    /// named after the text when nothing matches
    fn bang_move_to_task(&self, text: &str, follow: bool) -> Result<Vec<UiEffect>> {
        let mut tasks = self.tasks.write();
        let Some(tab_id) = tasks.selected_tab().map(|t| t.id.clone()) else {
            return Ok(Vec::new());
        };

        let existing = if text.is_empty() {
            None
        } else {
            first_task_match(&tasks, text)
        };
        let destination = match existing {
            Some(task_id) => Destination::Task(task_id),
            None => Destination::New {
                name: (!text.is_empty()).then(|| text.to_string()),
            },
        };

        if follow {
            let moved = tasks.move_tab_and_follow(&tab_id, destination, Placement::End)?;
            return Ok(vec![UiEffect::SwitchToTask(moved.task_id)]);
        }

        tasks.move_tab(&tab_id, destination, Placement::End)?;
        let mut effects = vec![UiEffect::RefreshTabBar];
        if let Some(current) = tasks.selected_tab() {
            effects.push(UiEffect::SwitchToTab(current.id.clone()));
        }
        Ok(effects)
    }

    fn bang_new_task(&self, text: &str) -> Result<Vec<UiEffect>> {
        let mut tasks = self.tasks.write();
        let init = TaskInit {
            name: (!text.is_empty()).then(|| text.to_string()),
            ..TaskInit::default()
        };
        let task_id = tasks.add(init, None);
        tasks.set_selected(task_id)?;
        Ok(vec![UiEffect::SwitchToTask(task_id)])
    }

    /// Close the named or numbered task, or the current one
    fn bang_close_task(&self, text: &str) -> Result<Vec<UiEffect>> {
        let mut tasks = self.tasks.write();
        let current = tasks.selected_id();

        let target = if text.is_empty() {
            Some(current)
        } else {
            tasks.task_by_name_or_number(text).map(|t| t.id)
        };
        let Some(task_id) = target else {
            tracing::debug!(task_query = text, "No task to close");
            return Ok(Vec::new());
        };

        tasks.close_task(task_id)?;

        let mut effects = vec![UiEffect::CloseTask(task_id)];
        if task_id == current {
            effects.push(UiEffect::SwitchToTask(tasks.selected_id()));
            effects.push(UiEffect::ShowTaskOverlay);
        }
        Ok(effects)
    }

    fn bang_name_task(&self, text: &str) -> Result<Vec<UiEffect>> {
        let mut tasks = self.tasks.write();
        let task_id = tasks.selected_id();
        tasks.rename_task(task_id, text)?;
        Ok(vec![UiEffect::UpdateTaskName])
    }

    fn bang_sort(&self) -> Result<Vec<UiEffect>> {
        let mut tasks = self.tasks.write();
        let task_id = tasks.selected_id();
        tasks.sort_tabs_by_activity(task_id)?;
        Ok(vec![UiEffect::RefreshTabBar])
    }

    /// Switch to the best matching tab among those playing audio
    fn bang_playing(&self, text: &str) -> Result<Vec<UiEffect>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let mut tasks = self.tasks.write();
        let playing = tabs_with_audio(&tasks);
        let Some(found) = search_and_sort_tabs(&tasks, text, Some(playing.as_slice()))
            .into_iter()
            .next()
        else {
            return Ok(Vec::new());
        };

        tasks.set_selected(found.task_id)?;
        tasks.select_tab(found.task_id, &found.tab_id)?;
        Ok(vec![
            UiEffect::SwitchToTask(found.task_id),
            UiEffect::SwitchToTab(found.tab_id),
        ])
    }
}

/// Add a tab right after the task's selected tab and select it
fn open_tab(tasks: &mut TaskStore, task_id: TaskId, init: NewTab) -> Result<TabId> {
    let placement = tasks
        .get(task_id)
        .and_then(|task| {
            let selected = task.selected_tab()?;
            task.tabs().get_index(selected)
        })
        .map_or(Placement::End, |index| Placement::Index(index + 1));

    let tab_id = tasks.add_tab(task_id, init, placement)?;
    tasks.select_tab(task_id, &tab_id)?;
    Ok(tab_id)
}

impl Clone for Browser {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            tasks: Arc::clone(&self.tasks),
            modes: Arc::clone(&self.modes),
            bangs: Arc::clone(&self.bangs),
            localizer: Arc::clone(&self.localizer),
        }
    }
}
