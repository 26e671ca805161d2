//! Task reminders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TaskId;

/// A reminder scheduled for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub task_id: TaskId,
    pub remind_at: DateTime<Utc>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_sent: bool,
    pub created_at: DateTime<Utc>,
}
