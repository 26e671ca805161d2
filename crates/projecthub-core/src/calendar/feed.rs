//! Range queries for the calendar feed and the deadline list.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Priority, Task, TaskId};
use crate::timeline::{DateWindow, TimedItem};

/// Items that touch `range`.
///
/// An item is kept when its end date falls inside the range, when its
/// start date does, or when it starts before and ends after the range.
pub fn filter_in_range<'a, T: TimedItem>(items: &'a [T], range: &DateWindow) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| {
            let start = item.start_date();
            let end = item.end_date();
            let ends_inside = end.is_some_and(|d| range.contains(d));
            let starts_inside = start.is_some_and(|d| range.contains(d));
            let spans = matches!((start, end), (Some(s), Some(e)) if s <= range.start() && e >= range.end());
            ends_inside || starts_inside || spans
        })
        .collect()
}

/// One entry of the upcoming-deadlines list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deadline {
    pub task_id: TaskId,
    pub title: String,
    pub due: NaiveDate,
    pub priority: Priority,
    pub days_until: i64,
}

/// Unfinished tasks due between `today` and `today + days`, soonest first.
pub fn upcoming_deadlines(tasks: &[Task], today: NaiveDate, days: u32) -> Vec<Deadline> {
    let horizon = today
        .checked_add_days(chrono::Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX);

    let mut deadlines: Vec<Deadline> = tasks
        .iter()
        .filter(|t| !t.is_done())
        .filter_map(|t| {
            let due = t.end_date()?;
            (today <= due && due <= horizon).then(|| Deadline {
                task_id: t.id,
                title: t.title.clone(),
                due,
                priority: t.priority,
                days_until: (due - today).num_days(),
            })
        })
        .collect();
    deadlines.sort_by_key(|d| d.due);
    deadlines
}
