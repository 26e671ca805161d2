//! The inclusive date range a view currently shows.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;

/// Inclusive `[start, end]` range of calendar dates, `start <= end`.
///
/// Windows are never mutated; navigation builds a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// # Errors
    /// Returns [`ValidationError::InvalidDateRange`] if `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The whole calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        Self {
            start: first_of_month(date),
            end: last_of_month(date),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, counting both ends.
    pub fn len_days(&self) -> u32 {
        // start <= end is guaranteed by construction
        ((self.end - self.start).num_days() + 1) as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the window, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub(crate) fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    let next_month = first
        .checked_add_months(chrono::Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    next_month.pred_opt().unwrap_or(next_month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        let err = DateWindow::new(ymd(2024, 6, 2), ymd(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
    }

    #[test]
    fn single_day_window_has_length_one() {
        let w = DateWindow::new(ymd(2024, 6, 2), ymd(2024, 6, 2)).unwrap();
        assert_eq!(w.len_days(), 1);
        assert_eq!(w.days().count(), 1);
    }

    #[test]
    fn month_of_handles_leap_february() {
        let w = DateWindow::month_of(ymd(2024, 2, 17));
        assert_eq!(w.start(), ymd(2024, 2, 1));
        assert_eq!(w.end(), ymd(2024, 2, 29));
        assert_eq!(w.len_days(), 29);
    }

    #[test]
    fn month_of_december_ends_on_31st() {
        let w = DateWindow::month_of(ymd(2023, 12, 5));
        assert_eq!(w.end(), ymd(2023, 12, 31));
    }

    #[test]
    fn days_cover_window_inclusively() {
        let w = DateWindow::month_of(ymd(2024, 6, 10));
        let days: Vec<_> = w.days().collect();
        assert_eq!(days.len(), 30);
        assert_eq!(days.first(), Some(&ymd(2024, 6, 1)));
        assert_eq!(days.last(), Some(&ymd(2024, 6, 30)));
    }
}
