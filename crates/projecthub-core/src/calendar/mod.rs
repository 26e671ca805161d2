//! Calendar view: month grid, day buckets and navigation.

mod bucket;
mod feed;
mod grid;
mod navigator;

pub use bucket::{bucket_by_day, DayBuckets, DayCell};
pub use feed::{filter_in_range, upcoming_deadlines, Deadline};
pub use grid::{compute_grid, CalendarGrid, WeekStart};
pub use navigator::MonthNavigator;
