//! Optimistic commit of a kanban move.
//!
//! The board is updated locally first so the card lands where it was
//! dropped; if the persistence service then refuses the batch, the board
//! is restored to the snapshot taken before the move.

use chrono::{DateTime, Utc};

use super::{plan_move, KanbanBoard, MoveRequest, ReorderPlan};
use crate::error::{CoreError, ServiceError};
use crate::events::{Event, EventSink};

/// Persistence boundary for reorder batches.
pub trait TaskService {
    /// Store every update of `plan`, all or nothing.
    ///
    /// # Errors
    /// Returns an error if the batch could not be stored; nothing of it
    /// may have been persisted in that case.
    fn apply_reorder(&mut self, plan: &ReorderPlan) -> Result<(), ServiceError>;
}

impl<S: TaskService + ?Sized> TaskService for &mut S {
    fn apply_reorder(&mut self, plan: &ReorderPlan) -> Result<(), ServiceError> {
        (**self).apply_reorder(plan)
    }
}

/// Plan `request`, apply it to `board`, then hand it to `service`.
///
/// On success the applied plan is returned and [`Event::TaskMoved`] is
/// emitted. If the service fails, `board` is restored,
/// [`Event::MoveRolledBack`] is emitted and the service error returned.
/// A no-op move touches neither the service nor the sink.
///
/// # Errors
/// Returns [`CoreError::Reorder`] when the request does not match the
/// board, and [`CoreError::Service`] when the service rejects the batch.
pub fn commit_move<S, E>(
    board: &mut KanbanBoard,
    request: &MoveRequest,
    service: &mut S,
    sink: &mut E,
    now: DateTime<Utc>,
) -> Result<ReorderPlan, CoreError>
where
    S: TaskService + ?Sized,
    E: EventSink + ?Sized,
{
    let plan = plan_move(request, board)?;
    if plan.is_empty() {
        return Ok(plan);
    }

    let snapshot = board.clone();
    board.apply(&plan, now)?;

    match service.apply_reorder(&plan) {
        Ok(()) => {
            log::info!(
                "task {} moved to {}#{} ({} updates)",
                request.task_id,
                request.dest_column,
                request.dest_index,
                plan.len()
            );
            sink.emit(Event::TaskMoved {
                task_id: request.task_id,
                from: request.source_column,
                to: request.dest_column,
                position: request.dest_index as u32,
                updates: plan.len(),
                at: now,
            });
            Ok(plan)
        }
        Err(err) => {
            log::warn!("rolling back move of task {}: {err}", request.task_id);
            *board = snapshot;
            sink.emit(Event::MoveRolledBack {
                task_id: request.task_id,
                reason: err.to_string(),
                at: now,
            });
            Err(err.into())
        }
    }
}
