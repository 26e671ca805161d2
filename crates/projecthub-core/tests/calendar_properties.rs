//! Property tests for the month grid and per-day bucketing.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use projecthub_core::calendar::{bucket_by_day, compute_grid, CalendarGrid};
use projecthub_core::timeline::{DateSpan, DateWindow, TimedItem};
use proptest::prelude::*;

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (1990i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn any_weekday() -> impl Strategy<Value = Weekday> {
    (0u8..7).prop_map(|n| Weekday::try_from(n).unwrap())
}

proptest! {
    #[test]
    fn grid_is_idempotent(date in any_date(), week_start in any_weekday()) {
        prop_assert_eq!(compute_grid(date, week_start), compute_grid(date, week_start));
    }

    #[test]
    fn grid_is_whole_weeks_covering_the_month(date in any_date(), week_start in any_weekday()) {
        let days = compute_grid(date, week_start);
        prop_assert_eq!(days.len() % 7, 0);
        prop_assert!(days.len() >= 28 && days.len() <= 42);
        prop_assert_eq!(days[0].weekday(), week_start);
        prop_assert_eq!(days[days.len() - 1].weekday(), week_start.pred());

        for pair in days.windows(2) {
            prop_assert_eq!(pair[0].succ_opt(), Some(pair[1]));
        }

        let month = DateWindow::month_of(date);
        for day in month.days() {
            prop_assert!(days.contains(&day));
        }
    }

    #[test]
    fn grid_is_the_same_for_every_day_of_a_month(date in any_date(), week_start in any_weekday()) {
        let first = date.with_day(1).unwrap();
        prop_assert_eq!(compute_grid(first, week_start), compute_grid(date, week_start));
    }

    #[test]
    fn bucketing_then_flattening_keeps_in_range_items_in_order(
        month in any_date(),
        offsets in prop::collection::vec(prop::option::of(0u64..70), 0..40),
    ) {
        let grid = CalendarGrid::for_month(month, Weekday::Sun);
        // Offsets count from well before the grid so some items fall outside.
        let base = grid.first() - Days::new(14);
        let items: Vec<(usize, DateSpan)> = offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| {
                let start = offset.map(|o| base + Days::new(o));
                (i, DateSpan::open(start, start))
            })
            .collect();

        let buckets = bucket_by_day(items.iter().map(|(i, span)| Tagged(*i, *span)), &grid);
        let flattened: Vec<(NaiveDate, usize)> = buckets
            .flatten()
            .map(|t| (t.1.start.unwrap(), t.0))
            .collect();

        let mut expected: Vec<(NaiveDate, usize)> = items
            .iter()
            .filter_map(|(i, span)| span.start.filter(|d| grid.contains(*d)).map(|d| (d, *i)))
            .collect();
        // Stable sort keeps input order within a day.
        expected.sort_by_key(|(date, _)| *date);

        prop_assert_eq!(flattened, expected);
    }
}

/// A span tagged with its input index.
#[derive(Debug, Clone, Copy)]
struct Tagged(usize, DateSpan);

impl TimedItem for Tagged {
    fn start_date(&self) -> Option<NaiveDate> {
        self.1.start_date()
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.1.end_date()
    }
}
