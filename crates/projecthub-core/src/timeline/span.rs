//! Proportional placement of a date range inside a window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DateWindow, TimedItem};

/// Clipped, normalized horizontal extent of an item.
///
/// Both fractions are relative to the window length: `offset` is where the
/// bar starts, `width` how much of the track it covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleSpan {
    pub offset: f64,
    pub width: f64,
}

impl VisibleSpan {
    /// Right edge of the bar.
    pub fn end(&self) -> f64 {
        self.offset + self.width
    }

    /// Scale to a track of `track_width` units, e.g. pixels or percent.
    pub fn scaled(&self, track_width: f64) -> (f64, f64) {
        (self.offset * track_width, self.width * track_width)
    }
}

/// What to do with an item whose end date precedes its start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvertedRangePolicy {
    /// Draw a single day at the start date.
    #[default]
    CollapseToStart,
    /// Treat the range as `[end, start]`.
    Swap,
    /// Do not draw the item.
    Hide,
}

impl InvertedRangePolicy {
    /// Normalize `(start, end)` so that `start <= end`, or drop it.
    pub fn resolve(&self, start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        if start <= end {
            return Some((start, end));
        }
        match self {
            Self::CollapseToStart => Some((start, start)),
            Self::Swap => Some((end, start)),
            Self::Hide => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CollapseToStart => "collapse_to_start",
            Self::Swap => "swap",
            Self::Hide => "hide",
        }
    }
}

/// Compute where `item` sits in `window`, with inverted ranges collapsed
/// to their start date.
///
/// `window_length` is the number of day slots in the track, normally
/// `window.len_days()`. Returns `None` when either date is missing, when
/// the item does not overlap the window, or when `window_length` is zero.
pub fn compute_span<T: TimedItem + ?Sized>(
    item: &T,
    window: &DateWindow,
    window_length: u32,
) -> Option<VisibleSpan> {
    compute_span_with(item, window, window_length, InvertedRangePolicy::default())
}

/// [`compute_span`] with an explicit policy for inverted ranges.
pub fn compute_span_with<T: TimedItem + ?Sized>(
    item: &T,
    window: &DateWindow,
    window_length: u32,
    policy: InvertedRangePolicy,
) -> Option<VisibleSpan> {
    if window_length == 0 {
        return None;
    }
    let (start, end) = policy.resolve(item.start_date()?, item.end_date()?)?;

    if end < window.start() || start > window.end() {
        return None;
    }

    let visible_start = start.max(window.start());
    let visible_end = end.min(window.end());

    let offset_days = (visible_start - window.start()).num_days();
    let duration_days = (visible_end - visible_start).num_days() + 1;
    let length = f64::from(window_length);

    Some(VisibleSpan {
        offset: offset_days as f64 / length,
        width: duration_days as f64 / length,
    })
}

/// The three layout inputs bundled for per-row use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineLayout {
    pub window: DateWindow,
    pub window_length: u32,
    pub policy: InvertedRangePolicy,
}

impl TimelineLayout {
    /// One slot per day of `window`.
    pub fn for_window(window: DateWindow) -> Self {
        Self {
            window,
            window_length: window.len_days(),
            policy: InvertedRangePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: InvertedRangePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn span<T: TimedItem + ?Sized>(&self, item: &T) -> Option<VisibleSpan> {
        compute_span_with(item, &self.window, self.window_length, self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::DateSpan;

    fn june(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn may(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn july(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn june_window() -> DateWindow {
        DateWindow::new(june(1), june(30)).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn item_at_window_start() {
        let span = compute_span(&DateSpan::new(june(1), june(5)), &june_window(), 30).unwrap();
        assert_close(span.offset, 0.0);
        assert_close(span.width, 5.0 / 30.0);
    }

    #[test]
    fn item_clipped_on_the_left() {
        let span = compute_span(&DateSpan::new(may(20), june(3)), &june_window(), 30).unwrap();
        assert_close(span.offset, 0.0);
        assert_close(span.width, 3.0 / 30.0);
    }

    #[test]
    fn item_clipped_on_the_right() {
        let span = compute_span(&DateSpan::new(june(28), july(4)), &june_window(), 30).unwrap();
        assert_close(span.offset, 27.0 / 30.0);
        assert_close(span.width, 3.0 / 30.0);
        assert!(span.end() <= 1.0 + 1e-9);
    }

    #[test]
    fn item_exactly_covering_window() {
        let span = compute_span(&DateSpan::new(june(1), june(30)), &june_window(), 30).unwrap();
        assert_close(span.offset, 0.0);
        assert_close(span.width, 1.0);
    }

    #[test]
    fn item_clipped_on_both_sides() {
        let span = compute_span(&DateSpan::new(may(1), july(31)), &june_window(), 30).unwrap();
        assert_close(span.offset, 0.0);
        assert_close(span.width, 1.0);
    }

    #[test]
    fn item_fully_before_window() {
        assert!(compute_span(&DateSpan::new(may(1), may(31)), &june_window(), 30).is_none());
    }

    #[test]
    fn item_fully_after_window() {
        assert!(compute_span(&DateSpan::new(july(1), july(2)), &june_window(), 30).is_none());
    }

    #[test]
    fn zero_length_item_is_one_day_wide() {
        let span = compute_span(&DateSpan::new(june(10), june(10)), &june_window(), 30).unwrap();
        assert_close(span.offset, 9.0 / 30.0);
        assert_close(span.width, 1.0 / 30.0);
    }

    #[test]
    fn missing_dates_are_not_drawn() {
        let window = june_window();
        assert!(compute_span(&DateSpan::open(Some(june(1)), None), &window, 30).is_none());
        assert!(compute_span(&DateSpan::open(None, Some(june(1))), &window, 30).is_none());
        assert!(compute_span(&DateSpan::default(), &window, 30).is_none());
    }

    #[test]
    fn inverted_range_collapses_to_start_by_default() {
        let span = compute_span(&DateSpan::new(june(12), june(8)), &june_window(), 30).unwrap();
        assert_close(span.offset, 11.0 / 30.0);
        assert_close(span.width, 1.0 / 30.0);
    }

    #[test]
    fn inverted_range_with_start_outside_window_is_hidden_under_collapse() {
        // Collapsed to July 2, which no longer overlaps June.
        assert!(compute_span(&DateSpan::new(july(2), june(20)), &june_window(), 30).is_none());
    }

    #[test]
    fn inverted_range_swap_and_hide_policies() {
        let item = DateSpan::new(june(12), june(8));
        let window = june_window();
        let swapped = compute_span_with(&item, &window, 30, InvertedRangePolicy::Swap).unwrap();
        assert_close(swapped.offset, 7.0 / 30.0);
        assert_close(swapped.width, 5.0 / 30.0);
        assert!(compute_span_with(&item, &window, 30, InvertedRangePolicy::Hide).is_none());
    }

    #[test]
    fn zero_window_length_draws_nothing() {
        assert!(compute_span(&DateSpan::new(june(1), june(2)), &june_window(), 0).is_none());
    }

    #[test]
    fn layout_uses_window_length() {
        let layout = TimelineLayout::for_window(june_window());
        assert_eq!(layout.window_length, 30);
        let span = layout.span(&DateSpan::new(june(16), june(30))).unwrap();
        assert_close(span.offset, 0.5);
        assert_close(span.width, 0.5);
        let (left, width) = span.scaled(100.0);
        assert_close(left, 50.0);
        assert_close(width, 50.0);
    }
}
