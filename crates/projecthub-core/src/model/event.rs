//! Calendar entries derived from tasks.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Priority, Project, Task, TaskId};
use crate::kanban::Column;
use crate::timeline::TimedItem;

/// A task as rendered on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: TaskId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: String,
    pub status: Column,
    pub priority: Priority,
    pub project_id: i64,
    pub project_name: String,
}

impl CalendarEvent {
    /// Build the calendar entry for `task`.
    ///
    /// A task with only one date uses it for both ends; a task with no
    /// dates has no calendar entry.
    pub fn from_task(task: &Task, project: &Project) -> Option<Self> {
        let start = task.start_date.or(task.due_date)?;
        let end = task.due_date.or(task.start_date)?;
        Some(Self {
            id: task.id,
            title: task.title.clone(),
            start,
            end,
            color: task.color.clone().unwrap_or_else(|| project.color.clone()),
            status: task.status,
            priority: task.priority,
            project_id: task.project_id,
            project_name: project.name.clone(),
        })
    }
}

impl TimedItem for CalendarEvent {
    fn start_date(&self) -> Option<NaiveDate> {
        Some(self.start.date())
    }

    fn end_date(&self) -> Option<NaiveDate> {
        Some(self.end.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn due_only_task_uses_due_for_both_ends() {
        let project = Project::new(1, "Launch");
        let task = Task::new(5, "Deadline", 1).with_dates(None, Some(day(14)));
        let event = CalendarEvent::from_task(&task, &project).unwrap();
        assert_eq!(event.start.date(), day(14));
        assert_eq!(event.end.date(), day(14));
        assert_eq!(event.color, project.color);
        assert_eq!(event.project_name, "Launch");
    }

    #[test]
    fn undated_task_has_no_event() {
        let project = Project::new(1, "Launch");
        let task = Task::new(5, "Someday", 1);
        assert!(CalendarEvent::from_task(&task, &project).is_none());
    }

    #[test]
    fn task_color_overrides_project_color() {
        let project = Project::new(1, "Launch");
        let mut task = Task::new(5, "Colored", 1).with_dates(Some(day(1)), Some(day(2)));
        task.color = Some("#FF0000".into());
        let event = CalendarEvent::from_task(&task, &project).unwrap();
        assert_eq!(event.color, "#FF0000");
    }
}
