//! Task records as served by the backend.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::kanban::Column;
use crate::timeline::TimedItem;

/// Backend identifier of a task.
pub type TaskId = i64;

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(ValidationError::InvalidValue {
                field: "priority".to_string(),
                message: format!("unknown priority '{other}'"),
            }),
        }
    }
}

/// A task on a project board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: Column,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub parent_id: Option<TaskId>,
    /// Dense rank within `status`.
    #[serde(default)]
    pub position: u32,
    pub project_id: i64,
    /// Tasks this one depends on.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task in `todo` at position 0 with no dates.
    pub fn new(id: TaskId, title: impl Into<String>, project_id: i64) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            status: Column::Todo,
            priority: Priority::Medium,
            color: None,
            start_date: None,
            due_date: None,
            completed_at: None,
            estimated_hours: None,
            parent_id: None,
            position: 0,
            project_id,
            dependencies: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_status(mut self, status: Column, position: u32) -> Self {
        self.status = status;
        self.position = position;
        self
    }

    /// Set start and due dates at midnight.
    pub fn with_dates(mut self, start: Option<NaiveDate>, due: Option<NaiveDate>) -> Self {
        self.start_date = start.and_then(|d| d.and_hms_opt(0, 0, 0));
        self.due_date = due.and_then(|d| d.and_hms_opt(0, 0, 0));
        self
    }

    pub fn with_parent(mut self, parent_id: TaskId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = deps.into_iter().collect();
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == Column::Done
    }

    /// Change column, keeping `completed_at` consistent.
    ///
    /// Entering `done` stamps `now`; leaving it clears the stamp.
    pub fn set_status(&mut self, status: Column, now: DateTime<Utc>) {
        if status == self.status {
            return;
        }
        if status == Column::Done {
            self.completed_at = Some(now);
        } else if self.status == Column::Done {
            self.completed_at = None;
        }
        self.status = status;
        self.updated_at = Some(now);
    }
}

/// Partial update applied to a [`Task`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Column>,
    pub priority: Option<Priority>,
    pub color: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
    pub estimated_hours: Option<f64>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Task {
    /// Apply `patch`, routing column changes through [`Task::set_status`].
    pub fn apply(&mut self, patch: &TaskPatch, now: DateTime<Utc>) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = Some(description.clone());
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(ref color) = patch.color {
            self.color = Some(color.clone());
        }
        if let Some(start) = patch.start_date {
            self.start_date = Some(start);
        }
        if let Some(due) = patch.due_date {
            self.due_date = Some(due);
        }
        if let Some(hours) = patch.estimated_hours {
            self.estimated_hours = Some(hours);
        }
        if let Some(status) = patch.status {
            self.set_status(status, now);
        }
        if !patch.is_empty() {
            self.updated_at = Some(now);
        }
    }
}

impl TimedItem for Task {
    fn start_date(&self) -> Option<NaiveDate> {
        self.start_date.map(|dt| dt.date())
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.due_date.map(|dt| dt.date())
    }
}
