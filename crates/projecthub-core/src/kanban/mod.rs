//! Kanban board: columns, move planning and optimistic commits.

mod board;
mod column;
mod commit;
mod reorder;

pub use board::{ColumnView, KanbanBoard};
pub use column::{Column, WipLimits};
pub use commit::{commit_move, TaskService};
pub use reorder::{plan_move, MoveRequest, ReorderPlan, ReorderUpdate};
