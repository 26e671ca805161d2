//! Domain records shared by the views: tasks, projects, calendar events
//! and reminders.

mod event;
mod project;
mod reminder;
mod task;

pub use event::CalendarEvent;
pub use project::{Project, ProjectPatch, UserProfile};
pub use reminder::Reminder;
pub use task::{Priority, Task, TaskId, TaskPatch};
pub(crate) use project::default_project_color;
