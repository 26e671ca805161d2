//! End-to-end checks of the three views through the public API.

use chrono::{NaiveDate, Weekday};
use projecthub_core::calendar::{bucket_by_day, MonthNavigator};
use projecthub_core::kanban::{plan_move, Column, KanbanBoard, MoveRequest};
use projecthub_core::model::{CalendarEvent, Project, Task};
use projecthub_core::timeline::{compute_span, DateSpan, DateWindow, GanttChart, TimelineLayout};
use projecthub_core::{compute_grid, Event, View};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn june_2024() -> DateWindow {
    DateWindow::new(date(2024, 6, 1), date(2024, 6, 30)).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

#[test]
fn span_at_window_start() {
    let span = compute_span(&DateSpan::new(date(2024, 6, 1), date(2024, 6, 5)), &june_2024(), 30).unwrap();
    assert_close(span.offset, 0.0);
    assert_close(span.width, 5.0 / 30.0);
}

#[test]
fn span_clipped_at_window_start() {
    let span = compute_span(&DateSpan::new(date(2024, 5, 20), date(2024, 6, 3)), &june_2024(), 30).unwrap();
    assert_close(span.offset, 0.0);
    assert_close(span.width, 3.0 / 30.0);
}

#[test]
fn span_covering_window_fills_track() {
    let span = compute_span(&DateSpan::new(date(2024, 6, 1), date(2024, 6, 30)), &june_2024(), 30).unwrap();
    assert_close(span.offset, 0.0);
    assert_close(span.width, 1.0);
}

#[test]
fn june_2024_grid_spans_six_weeks() {
    let days = compute_grid(date(2024, 6, 1), Weekday::Sun);
    assert_eq!(days.len(), 42);
    assert_eq!(days.first(), Some(&date(2024, 5, 26)));
    assert_eq!(days.last(), Some(&date(2024, 7, 6)));
}

#[test]
fn move_into_done_reindexes_destination() {
    let board = KanbanBoard::from_tasks(vec![
        Task::new(1, "one", 1).with_status(Column::Todo, 0),
        Task::new(2, "two", 1).with_status(Column::Todo, 1),
        Task::new(7, "seven", 1).with_status(Column::Todo, 2),
        Task::new(10, "A", 1).with_status(Column::Done, 0),
        Task::new(11, "B", 1).with_status(Column::Done, 1),
    ]);
    let plan = plan_move(
        &MoveRequest {
            task_id: 7,
            source_column: Column::Todo,
            source_index: 2,
            dest_column: Column::Done,
            dest_index: 0,
        },
        &board,
    )
    .unwrap();

    assert_eq!(
        serde_json::to_value(&plan).unwrap(),
        serde_json::json!([
            {"id": 7, "position": 0, "column": "done"},
            {"id": 10, "position": 1},
            {"id": 11, "position": 2},
        ])
    );
}

#[test]
fn dropping_in_place_is_a_noop() {
    let board = KanbanBoard::from_tasks(vec![Task::new(3, "three", 1).with_status(Column::Review, 0)]);
    let plan = plan_move(
        &MoveRequest {
            task_id: 3,
            source_column: Column::Review,
            source_index: 0,
            dest_column: Column::Review,
            dest_index: 0,
        },
        &board,
    )
    .unwrap();
    assert!(plan.is_empty());
    assert_eq!(serde_json::to_string(&plan).unwrap(), "[]");
}

#[test]
fn navigating_months_feeds_calendar_and_gantt() {
    let project = Project::new(1, "Alpha");
    let tasks = vec![
        Task::new(1, "kickoff", 1).with_dates(Some(date(2024, 7, 1)), Some(date(2024, 7, 3))),
        Task::new(2, "launch", 1).with_dates(Some(date(2024, 7, 30)), Some(date(2024, 8, 2))),
        Task::new(3, "undated", 1),
    ];

    let mut navigator = MonthNavigator::new(date(2024, 6, 15), Weekday::Sun).for_view(View::Calendar);
    let mut events: Vec<Event> = Vec::new();
    let window = navigator.next(&mut events);
    assert_eq!(window, DateWindow::month_of(date(2024, 7, 1)));
    assert_eq!(
        events,
        vec![Event::WindowChanged {
            view: View::Calendar,
            start: date(2024, 7, 1),
            end: date(2024, 7, 31),
        }]
    );

    let entries: Vec<CalendarEvent> = tasks
        .iter()
        .filter_map(|t| CalendarEvent::from_task(t, &project))
        .collect();
    let buckets = bucket_by_day(entries, navigator.grid());
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets.get(date(2024, 7, 30))[0].title, "launch");

    let chart = GanttChart::layout(&tasks, TimelineLayout::for_window(navigator.window()), None);
    assert_eq!(chart.rows.len(), 3);
    let launch = chart.rows[1].span.unwrap();
    assert_close(launch.offset, 29.0 / 31.0);
    assert_close(launch.width, 2.0 / 31.0);
    assert!(chart.rows[2].span.is_none());
}
