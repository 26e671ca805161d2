//! Gantt chart rows, headers and the today marker.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::{DateWindow, TimelineLayout, VisibleSpan};
use crate::kanban::Column;
use crate::model::{Task, TaskId};

/// Fallback bar color when neither task nor project sets one.
pub const DEFAULT_BAR_COLOR: &str = "#6366F1";

/// One row of the chart.
///
/// Every task gets a row; `span` is `None` when it has no bar in the
/// current window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttRow {
    pub task_id: TaskId,
    pub title: String,
    pub color: String,
    /// Completion percentage, 0-100.
    pub progress: f64,
    pub span: Option<VisibleSpan>,
}

/// Column header for one day of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHeader {
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub is_today: bool,
}

/// Completion percentage shown inside a bar.
///
/// Parents report the share of finished subtasks; leaf tasks fall back to
/// a fixed value per column.
pub fn gantt_progress(task: &Task, all_tasks: &[Task]) -> f64 {
    let (total, done) = all_tasks
        .iter()
        .filter(|t| t.parent_id == Some(task.id))
        .fold((0u32, 0u32), |(total, done), t| {
            (total + 1, done + u32::from(t.is_done()))
        });

    if total > 0 {
        return f64::from(done) / f64::from(total) * 100.0;
    }

    match task.status {
        Column::Backlog => 0.0,
        Column::Todo => 10.0,
        Column::InProgress => 50.0,
        Column::Review => 80.0,
        Column::Done => 100.0,
    }
}

/// Laid-out chart for a set of tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttChart {
    pub layout: TimelineLayout,
    pub rows: Vec<GanttRow>,
}

impl GanttChart {
    /// Lay out `tasks` in input order.
    ///
    /// `project_color` is used for tasks without their own color.
    pub fn layout(tasks: &[Task], layout: TimelineLayout, project_color: Option<&str>) -> Self {
        Self::layout_with(tasks, layout, |_| project_color)
    }

    /// Like [`GanttChart::layout`], with the fallback color looked up per
    /// task from its project id.
    pub fn layout_with<'a>(
        tasks: &[Task],
        layout: TimelineLayout,
        project_color: impl Fn(i64) -> Option<&'a str>,
    ) -> Self {
        let rows = tasks
            .iter()
            .map(|task| GanttRow {
                task_id: task.id,
                title: task.title.clone(),
                color: task.color.clone().unwrap_or_else(|| {
                    project_color(task.project_id)
                        .unwrap_or(DEFAULT_BAR_COLOR)
                        .to_string()
                }),
                progress: gantt_progress(task, tasks),
                span: layout.span(task),
            })
            .collect();
        Self { layout, rows }
    }

    /// Rows that have a bar in the window.
    pub fn visible_rows(&self) -> impl Iterator<Item = &GanttRow> {
        self.rows.iter().filter(|row| row.span.is_some())
    }
}

/// One header per day of `window`, flagging weekends and `today`.
pub fn day_headers(window: &DateWindow, today: NaiveDate) -> Vec<DayHeader> {
    window
        .days()
        .map(|date| DayHeader {
            date,
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            is_today: date == today,
        })
        .collect()
}

/// Fractional position of the today line, centered on today's slot.
pub fn today_marker(window: &DateWindow, today: NaiveDate) -> Option<f64> {
    if !window.contains(today) {
        return None;
    }
    let days = (today - window.start()).num_days() as f64;
    Some((days + 0.5) / f64::from(window.len_days()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn leaf_progress_follows_status() {
        let tasks = vec![Task::new(1, "a", 1).with_status(Column::Review, 0)];
        assert_eq!(gantt_progress(&tasks[0], &tasks), 80.0);
    }

    #[test]
    fn parent_progress_counts_done_subtasks() {
        let tasks = vec![
            Task::new(1, "parent", 1).with_status(Column::Todo, 0),
            Task::new(2, "sub a", 1).with_parent(1).with_status(Column::Done, 0),
            Task::new(3, "sub b", 1).with_parent(1).with_status(Column::Todo, 1),
            Task::new(4, "sub c", 1).with_parent(1).with_status(Column::Done, 1),
            Task::new(5, "sub d", 1).with_parent(1).with_status(Column::Review, 0),
        ];
        assert_eq!(gantt_progress(&tasks[0], &tasks), 50.0);
    }

    #[test]
    fn chart_keeps_undrawable_rows() {
        let window = DateWindow::month_of(june(1));
        let tasks = vec![
            Task::new(1, "dated", 1).with_dates(Some(june(3)), Some(june(4))),
            Task::new(2, "undated", 1),
        ];
        let chart = GanttChart::layout(&tasks, TimelineLayout::for_window(window), Some("#123456"));
        assert_eq!(chart.rows.len(), 2);
        assert_eq!(chart.visible_rows().count(), 1);
        assert_eq!(chart.rows[1].span, None);
        assert_eq!(chart.rows[0].color, "#123456");
    }

    #[test]
    fn rows_fall_back_to_their_own_project_color() {
        let window = DateWindow::month_of(june(1));
        let mut own = Task::new(3, "own", 1);
        own.color = Some("#EF4444".into());
        let tasks = vec![
            Task::new(1, "alpha", 1),
            Task::new(2, "beta", 2),
            own,
            Task::new(4, "gamma", 9),
        ];
        let colors = |project: i64| match project {
            1 => Some("#10B981"),
            2 => Some("#F59E0B"),
            _ => None,
        };
        let chart = GanttChart::layout_with(&tasks, TimelineLayout::for_window(window), colors);
        let colors: Vec<_> = chart.rows.iter().map(|r| r.color.as_str()).collect();
        assert_eq!(colors, vec!["#10B981", "#F59E0B", "#EF4444", DEFAULT_BAR_COLOR]);
    }

    #[test]
    fn headers_flag_weekends_and_today() {
        let window = DateWindow::new(june(7), june(10)).unwrap();
        let headers = day_headers(&window, june(9));
        let weekend: Vec<_> = headers.iter().map(|h| h.is_weekend).collect();
        // 2024-06-07 is a Friday
        assert_eq!(weekend, vec![false, true, true, false]);
        assert!(headers[2].is_today);
        assert_eq!(headers.iter().filter(|h| h.is_today).count(), 1);
    }

    #[test]
    fn today_marker_centers_on_the_day() {
        let window = DateWindow::month_of(june(1));
        let marker = today_marker(&window, june(1)).unwrap();
        assert!((marker - 0.5 / 30.0).abs() < 1e-9);
        assert!(today_marker(&window, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()).is_none());
    }
}
