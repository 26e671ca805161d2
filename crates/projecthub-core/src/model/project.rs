//! Projects and user profiles.

use serde::{Deserialize, Serialize};

/// A project that groups tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_project_color")]
    pub color: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub task_count: u32,
    #[serde(default)]
    pub completed_count: u32,
}

/// Partial update applied to a [`Project`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub is_archived: Option<bool>,
}

pub(crate) fn default_project_color() -> String {
    "#6366F1".into()
}

impl Project {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            color: default_project_color(),
            is_archived: false,
            task_count: 0,
            completed_count: 0,
        }
    }

    pub fn apply(&mut self, patch: &ProjectPatch) {
        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = Some(description.clone());
        }
        if let Some(ref color) = patch.color {
            self.color = color.clone();
        }
        if let Some(archived) = patch.is_archived {
            self.is_archived = archived;
        }
    }
}

/// The signed-in user as shown in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_project_color")]
    pub avatar_color: String,
}
