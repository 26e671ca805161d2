//! # ProjectHub Core Library
//!
//! This library provides the view logic shared by the ProjectHub client:
//! the Gantt timeline, the month calendar and the kanban board. Everything
//! here is synchronous and free of I/O except the storage module, so the
//! same code backs the standalone CLI binary and any GUI layered on top.
//!
//! ## Architecture
//!
//! - **Timeline**: Maps task date ranges onto a visible date window
//! - **Calendar**: Month grid, per-day buckets and month navigation
//! - **Kanban**: Turns drag-and-drop moves into dense reorder plans and
//!   commits them optimistically
//! - **Dashboard**: Task counts and completion rate per project
//! - **State**: Explicit application state with a persisted subset
//! - **Storage**: SQLite task store and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`compute_span`]: Clipped, normalized bar placement
//! - [`compute_grid`] / [`bucket_by_day`]: Calendar page and its contents
//! - [`plan_move`] / [`commit_move`]: Kanban reordering
//! - [`TaskDb`]: Local persistence and the [`TaskService`] boundary
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod kanban;
pub mod model;
pub mod state;
pub mod storage;
pub mod timeline;

pub use calendar::{bucket_by_day, compute_grid, CalendarGrid, DayBuckets, MonthNavigator};
pub use dashboard::{dashboard_stats, DashboardStats};
pub use error::{ConfigError, CoreError, DatabaseError, ReorderError, ServiceError, ValidationError};
pub use events::{Event, EventSink};
pub use kanban::{commit_move, plan_move, Column, KanbanBoard, MoveRequest, ReorderPlan, TaskService};
pub use model::{CalendarEvent, Priority, Project, Reminder, Task, TaskId};
pub use state::{AppState, View};
pub use storage::{Config, TaskDb};
pub use timeline::{compute_span, DateWindow, TimedItem, TimelineLayout, VisibleSpan};
