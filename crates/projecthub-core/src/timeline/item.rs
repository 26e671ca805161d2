//! Items that occupy a date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Anything with an optional start and an optional end date.
///
/// Tasks use their due date as the end. Either side may be missing
/// independently; the layout code only reads through this trait.
pub trait TimedItem {
    fn start_date(&self) -> Option<NaiveDate>;
    fn end_date(&self) -> Option<NaiveDate>;
}

impl<T: TimedItem + ?Sized> TimedItem for &T {
    fn start_date(&self) -> Option<NaiveDate> {
        (**self).start_date()
    }

    fn end_date(&self) -> Option<NaiveDate> {
        (**self).end_date()
    }
}

/// A bare date range, for callers that have no richer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn open(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }
}

impl TimedItem for DateSpan {
    fn start_date(&self) -> Option<NaiveDate> {
        self.start
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end
    }
}
