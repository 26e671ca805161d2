//! Timeline layout for the Gantt view.
//!
//! This module provides:
//! - [`DateWindow`], the inclusive range a view shows
//! - [`compute_span`], mapping an item's dates onto a window as fractions
//! - Gantt rows, day headers and the today marker
//! - Dependency-aware date shifting

mod dependency;
mod gantt;
mod item;
mod span;
mod window;

pub use dependency::shift_dependents;
pub use gantt::{day_headers, gantt_progress, today_marker, DayHeader, GanttChart, GanttRow, DEFAULT_BAR_COLOR};
pub use item::{DateSpan, TimedItem};
pub use span::{compute_span, compute_span_with, InvertedRangePolicy, TimelineLayout, VisibleSpan};
pub use window::DateWindow;
pub(crate) use window::{first_of_month, last_of_month};
