//! Previous / next / today navigation shared by the calendar and Gantt views.

use chrono::{Months, NaiveDate, Weekday};

use super::CalendarGrid;
use crate::events::{Event, EventSink};
use crate::state::View;
use crate::timeline::{first_of_month, DateWindow, TimelineLayout};

/// Holds the month a view is showing.
///
/// Each navigation step replaces the month wholesale, rebuilds the grid
/// and announces the new month bounds as [`Event::WindowChanged`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthNavigator {
    view: View,
    reference: NaiveDate,
    grid: CalendarGrid,
}

impl MonthNavigator {
    /// Start on the month containing `date`. No event is emitted.
    pub fn new(date: NaiveDate, week_start: Weekday) -> Self {
        let reference = first_of_month(date);
        Self {
            view: View::Calendar,
            reference,
            grid: CalendarGrid::for_month(reference, week_start),
        }
    }

    /// Tag emitted events with `view` (calendar by default).
    pub fn for_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    /// First day of the current month.
    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    pub fn grid(&self) -> &CalendarGrid {
        &self.grid
    }

    /// First..last day of the current month.
    pub fn window(&self) -> DateWindow {
        self.grid.month()
    }

    /// Layout for a Gantt chart over the current month.
    pub fn timeline(&self) -> TimelineLayout {
        TimelineLayout::for_window(self.window())
    }

    /// Header text, e.g. "June 2024".
    pub fn title(&self) -> String {
        self.reference.format("%B %Y").to_string()
    }

    pub fn previous<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> DateWindow {
        match self.reference.checked_sub_months(Months::new(1)) {
            Some(month) => self.go_to(month, sink),
            None => self.window(),
        }
    }

    pub fn next<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> DateWindow {
        match self.reference.checked_add_months(Months::new(1)) {
            Some(month) => self.go_to(month, sink),
            None => self.window(),
        }
    }

    /// Jump to the month containing `today`.
    pub fn today<S: EventSink + ?Sized>(&mut self, today: NaiveDate, sink: &mut S) -> DateWindow {
        self.go_to(today, sink)
    }

    fn go_to<S: EventSink + ?Sized>(&mut self, date: NaiveDate, sink: &mut S) -> DateWindow {
        self.reference = first_of_month(date);
        self.grid = CalendarGrid::for_month(self.reference, self.grid.week_start());
        let window = self.window();
        log::debug!("{} view moved to {window}", self.view);
        sink.emit(Event::WindowChanged {
            view: self.view,
            start: window.start(),
            end: window.end(),
        });
        window
    }
}
