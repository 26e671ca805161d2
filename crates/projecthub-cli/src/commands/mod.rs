pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod gantt;
pub mod kanban;
pub mod project;
pub mod reminder;
pub mod state;
pub mod task;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Parse `YYYY-MM` into the first day of that month.
pub fn parse_month(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM, got '{value}': {e}"))
}

/// The local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Dates given on the command line are stored at midnight.
pub fn at_midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
