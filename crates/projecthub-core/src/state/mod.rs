//! Client application state.
//!
//! One explicit [`AppState`] value holds the session, the loaded projects
//! and tasks, and the UI toggles. Only the [`PersistedState`] subset is
//! written to disk; everything else is refetched after a restart.

mod store;

pub use store::{FileStateStore, MemoryStateStore, StateStore, STORAGE_KEY};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::model::{Project, ProjectPatch, Task, TaskId, TaskPatch, UserProfile};

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Dashboard,
    Kanban,
    Gantt,
    Calendar,
    List,
}

impl View {
    pub fn all() -> [View; 5] {
        [
            View::Dashboard,
            View::Kanban,
            View::Gantt,
            View::Calendar,
            View::List,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Kanban => "kanban",
            Self::Gantt => "gantt",
            Self::Calendar => "calendar",
            Self::List => "list",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::all()
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "view".to_string(),
                message: format!("unknown view '{s}'"),
            })
    }
}

/// The part of [`AppState`] that survives a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub current_project: Option<Project>,
    #[serde(default = "default_sidebar_open")]
    pub sidebar_open: bool,
    #[serde(default)]
    pub current_view: View,
}

fn default_sidebar_open() -> bool {
    true
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            is_authenticated: false,
            current_project: None,
            sidebar_open: true,
            current_view: View::Dashboard,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
    pub projects: Vec<Project>,
    pub current_project: Option<Project>,
    pub tasks: Vec<Task>,
    pub sidebar_open: bool,
    pub current_view: View,
}

impl Default for AppState {
    fn default() -> Self {
        Self::restore(PersistedState::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the persisted subset; lists start empty.
    pub fn restore(persisted: PersistedState) -> Self {
        Self {
            user: None,
            is_authenticated: persisted.is_authenticated,
            projects: Vec::new(),
            current_project: persisted.current_project,
            tasks: Vec::new(),
            sidebar_open: persisted.sidebar_open,
            current_view: persisted.current_view,
        }
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            is_authenticated: self.is_authenticated,
            current_project: self.current_project.clone(),
            sidebar_open: self.sidebar_open,
            current_view: self.current_view,
        }
    }

    pub fn set_user(&mut self, user: Option<UserProfile>) {
        self.is_authenticated = user.is_some();
        self.user = user;
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.is_authenticated = false;
        self.projects.clear();
        self.tasks.clear();
        self.current_project = None;
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
    }

    pub fn select_project(&mut self, project: Option<Project>) {
        self.current_project = project;
    }

    /// Select a loaded project by id.
    ///
    /// # Errors
    /// Returns an error if no loaded project has that id.
    pub fn select_project_id(&mut self, id: i64) -> Result<&Project, ValidationError> {
        let project = self
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "project".to_string(),
                message: format!("project {id} is not loaded"),
            })?;
        Ok(self.current_project.insert(project))
    }

    pub fn add_project(&mut self, project: Project) {
        self.projects.push(project);
    }

    /// Patch a project in the list and, if selected, the selection too.
    pub fn update_project(&mut self, id: i64, patch: &ProjectPatch) {
        for project in self.projects.iter_mut().filter(|p| p.id == id) {
            project.apply(patch);
        }
        if let Some(current) = self.current_project.as_mut().filter(|p| p.id == id) {
            current.apply(patch);
        }
    }

    pub fn remove_project(&mut self, id: i64) {
        self.projects.retain(|p| p.id != id);
        if self.current_project.as_ref().is_some_and(|p| p.id == id) {
            self.current_project = None;
        }
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn update_task(&mut self, id: TaskId, patch: &TaskPatch, now: DateTime<Utc>) {
        for task in self.tasks.iter_mut().filter(|t| t.id == id) {
            task.apply(patch, now);
        }
    }

    pub fn remove_task(&mut self, id: TaskId) {
        self.tasks.retain(|t| t.id != id);
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Tasks belonging to the selected project, or all when none is selected.
    pub fn project_tasks(&self) -> Vec<&Task> {
        match &self.current_project {
            Some(project) => self
                .tasks
                .iter()
                .filter(|t| t.project_id == project.id)
                .collect(),
            None => self.tasks.iter().collect(),
        }
    }
}
