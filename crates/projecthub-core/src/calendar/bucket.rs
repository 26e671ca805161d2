//! Grouping items under the grid day they start on.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::CalendarGrid;
use crate::timeline::{DateWindow, TimedItem};

/// Items keyed by start date, each bucket in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBuckets<T> {
    range: DateWindow,
    buckets: BTreeMap<NaiveDate, Vec<T>>,
}

/// What one grid cell renders: the first few items and how many were cut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell<'a, T> {
    pub date: NaiveDate,
    pub visible: &'a [T],
    pub overflow: usize,
}

impl<T> DayCell<'_, T> {
    /// `"+N more"` when items were cut.
    pub fn overflow_label(&self) -> Option<String> {
        (self.overflow > 0).then(|| format!("+{} more", self.overflow))
    }

    pub fn total(&self) -> usize {
        self.visible.len() + self.overflow
    }
}

/// Place each item under its start date.
///
/// Items without a start date, or starting outside the grid, are left out.
pub fn bucket_by_day<T, I>(items: I, grid: &CalendarGrid) -> DayBuckets<T>
where
    T: TimedItem,
    I: IntoIterator<Item = T>,
{
    let range = grid.span();
    let mut buckets: BTreeMap<NaiveDate, Vec<T>> = BTreeMap::new();
    let mut skipped = 0usize;

    for item in items {
        match item.start_date() {
            Some(day) if range.contains(day) => buckets.entry(day).or_default().push(item),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("{skipped} item(s) outside calendar grid {range}");
    }
    DayBuckets { range, buckets }
}

impl<T> DayBuckets<T> {
    /// Items starting on `date`, possibly empty.
    pub fn get(&self, date: NaiveDate) -> &[T] {
        self.buckets.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cell(&self, date: NaiveDate, max_visible: usize) -> DayCell<'_, T> {
        let items = self.get(date);
        let shown = items.len().min(max_visible);
        DayCell {
            date,
            visible: &items[..shown],
            overflow: items.len() - shown,
        }
    }

    /// Days with at least one item, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    /// All bucketed items, by day then input order.
    pub fn flatten(&self) -> impl Iterator<Item = &T> {
        self.buckets.values().flatten()
    }

    pub fn into_flat(self) -> Vec<T> {
        self.buckets.into_values().flatten().collect()
    }

    pub fn range(&self) -> DateWindow {
        self.range
    }

    /// Total number of bucketed items.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
