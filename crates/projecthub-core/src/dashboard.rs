//! Project dashboard statistics
//!
//! Summarizes a project's tasks for the dashboard cards:
//! - **Counts**: total, completed, in progress and overdue tasks
//! - **Completion rate**: share of finished tasks as a whole percentage
//! - **Lists**: the newest open tasks and the open high-priority ones

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::kanban::Column;
use crate::model::{Priority, Task};

/// Counters shown at the top of the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Number of tasks considered
    pub total: u32,
    /// Tasks in the done column
    pub completed: u32,
    /// Tasks in the in-progress column
    pub in_progress: u32,
    /// Unfinished tasks whose due date is before today
    pub overdue: u32,
    /// Rounded percentage of completed tasks (0 to 100)
    pub completion_rate: u32,
}

/// Count tasks for the dashboard as of `today`.
pub fn dashboard_stats(tasks: &[Task], today: NaiveDate) -> DashboardStats {
    let mut stats = DashboardStats::default();
    for task in tasks {
        stats.total += 1;
        match task.status {
            Column::Done => stats.completed += 1,
            Column::InProgress => stats.in_progress += 1,
            _ => {}
        }
        let overdue = task.due_date.is_some_and(|due| due.date() < today);
        if overdue && !task.is_done() {
            stats.overdue += 1;
        }
    }
    if stats.total > 0 {
        let rate = f64::from(stats.completed) / f64::from(stats.total) * 100.0;
        stats.completion_rate = rate.round() as u32;
    }
    stats
}

/// Newest unfinished tasks, at most `limit`.
pub fn recent_open_tasks(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut open: Vec<&Task> = tasks.iter().filter(|t| !t.is_done()).collect();
    open.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    open.truncate(limit);
    open
}

/// Unfinished high or urgent tasks in input order, at most `limit`.
pub fn high_priority_open_tasks(tasks: &[Task], limit: usize) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| !t.is_done() && matches!(t.priority, Priority::High | Priority::Urgent))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn june(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_empty_project_has_zero_rate() {
        assert_eq!(dashboard_stats(&[], june(10)), DashboardStats::default());
    }

    #[test]
    fn test_counts_and_rate() {
        let tasks = vec![
            Task::new(1, "done", 1).with_status(Column::Done, 0),
            Task::new(2, "doing", 1).with_status(Column::InProgress, 0),
            Task::new(3, "late", 1).with_dates(None, Some(june(9))),
            Task::new(4, "due today", 1).with_dates(None, Some(june(10))),
            Task::new(5, "done late", 1)
                .with_status(Column::Done, 1)
                .with_dates(None, Some(june(1))),
            Task::new(6, "backlog", 1).with_status(Column::Backlog, 0),
        ];
        let stats = dashboard_stats(&tasks, june(10));
        assert_eq!(
            stats,
            DashboardStats {
                total: 6,
                completed: 2,
                in_progress: 1,
                overdue: 1,
                completion_rate: 33,
            }
        );
    }

    #[test]
    fn test_rate_rounds_half_up() {
        let tasks = vec![
            Task::new(1, "a", 1).with_status(Column::Done, 0),
            Task::new(2, "b", 1),
            Task::new(3, "c", 1).with_status(Column::Todo, 1),
            Task::new(4, "d", 1).with_status(Column::Todo, 2),
            Task::new(5, "e", 1).with_status(Column::Todo, 3),
            Task::new(6, "f", 1).with_status(Column::Todo, 4),
            Task::new(7, "g", 1).with_status(Column::Todo, 5),
            Task::new(8, "h", 1).with_status(Column::Todo, 6),
        ];
        // 1 of 8 is 12.5%
        assert_eq!(dashboard_stats(&tasks, june(1)).completion_rate, 13);
    }

    #[test]
    fn test_lists_skip_finished_tasks() {
        let now = Utc::now();
        let mut tasks = vec![
            Task::new(1, "old", 1),
            Task::new(2, "new", 1),
            Task::new(3, "finished", 1).with_status(Column::Done, 0),
            Task::new(4, "urgent", 1),
        ];
        tasks[0].created_at = now - Duration::days(3);
        tasks[1].created_at = now;
        tasks[2].created_at = now + Duration::days(1);
        tasks[3].created_at = now - Duration::days(1);
        tasks[3].priority = Priority::Urgent;
        tasks[2].priority = Priority::High;

        let recent: Vec<_> = recent_open_tasks(&tasks, 2).iter().map(|t| t.id).collect();
        assert_eq!(recent, vec![2, 4]);

        let urgent: Vec<_> = high_priority_open_tasks(&tasks, 5).iter().map(|t| t.id).collect();
        assert_eq!(urgent, vec![4]);
    }
}
