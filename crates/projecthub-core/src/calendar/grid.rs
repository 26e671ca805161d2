//! Month grid for the calendar view.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::timeline::{first_of_month, last_of_month, DateWindow};

/// First day of the week as stored in configuration (`"sun"`, `"mon"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Sun => Weekday::Sun,
            Self::Mon => Weekday::Mon,
            Self::Tue => Weekday::Tue,
            Self::Wed => Weekday::Wed,
            Self::Thu => Weekday::Thu,
            Self::Fri => Weekday::Fri,
            Self::Sat => Weekday::Sat,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
        }
    }
}

impl From<Weekday> for WeekStart {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Sun => Self::Sun,
            Weekday::Mon => Self::Mon,
            Weekday::Tue => Self::Tue,
            Weekday::Wed => Self::Wed,
            Weekday::Thu => Self::Thu,
            Weekday::Fri => Self::Fri,
            Weekday::Sat => Self::Sat,
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekStart {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Weekday>()
            .map(Self::from)
            .map_err(|_| ValidationError::InvalidValue {
                field: "week_start".to_string(),
                message: format!("unknown weekday '{s}'"),
            })
    }
}

/// Days from `from` back to the most recent `to` (0 when equal).
fn days_back(from: Weekday, to: Weekday) -> i64 {
    let from = i64::from(from.num_days_from_monday());
    let to = i64::from(to.num_days_from_monday());
    (from - to).rem_euclid(7)
}

/// Every date shown on the month page containing `month_reference`.
///
/// The month is padded back to the nearest `week_start` on or before its
/// first day and forward to the last day of that week on or after its last
/// day, so the result is contiguous, ascending and a whole number of
/// weeks.
pub fn compute_grid(month_reference: NaiveDate, week_start: Weekday) -> Vec<NaiveDate> {
    let first = first_of_month(month_reference);
    let last = last_of_month(month_reference);

    let lead = days_back(first.weekday(), week_start);
    // distance forward from `last` to the final day of its week
    let trail = days_back(week_start.pred(), last.weekday());
    let grid_start = first - Duration::days(lead);
    let grid_end = last + Duration::days(trail);

    grid_start
        .iter_days()
        .take_while(|d| *d <= grid_end)
        .collect()
}

/// A computed month page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    month: DateWindow,
    span: DateWindow,
    week_start: Weekday,
    days: Vec<NaiveDate>,
}

impl CalendarGrid {
    pub fn for_month(month_reference: NaiveDate, week_start: Weekday) -> Self {
        let days = compute_grid(month_reference, week_start);
        let month = DateWindow::month_of(month_reference);
        // compute_grid always covers the month, so the bounds exist
        let span = match (days.first(), days.last()) {
            (Some(&first), Some(&last)) => DateWindow::new(first, last).unwrap_or(month),
            _ => month,
        };
        log::debug!("computed calendar grid {span} for month {month}");
        Self {
            month,
            span,
            week_start,
            days,
        }
    }

    /// First..last day of the reference month.
    pub fn month(&self) -> DateWindow {
        self.month
    }

    /// First..last day shown, padding included.
    pub fn span(&self) -> DateWindow {
        self.span
    }

    pub fn first(&self) -> NaiveDate {
        self.span.start()
    }

    pub fn last(&self) -> NaiveDate {
        self.span.end()
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[NaiveDate]> {
        self.days.chunks(7)
    }

    /// Whether `date` belongs to the reference month (not the padding).
    pub fn is_in_month(&self, date: NaiveDate) -> bool {
        self.month.contains(date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.span.contains(date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
