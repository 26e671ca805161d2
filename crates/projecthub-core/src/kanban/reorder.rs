//! Translating a drag-and-drop move into position updates.
//!
//! A move touches up to two columns. The destination is re-indexed in full
//! (every task in it is listed), the source is closed up behind the moved
//! task. Applying the resulting plan keeps both columns dense.

use serde::{Deserialize, Serialize};

use super::{Column, KanbanBoard};
use crate::error::ReorderError;
use crate::model::TaskId;

/// A "move requested" message from the board UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub task_id: TaskId,
    pub source_column: Column,
    pub source_index: usize,
    pub dest_column: Column,
    pub dest_index: usize,
}

impl MoveRequest {
    pub fn is_noop(&self) -> bool {
        self.source_column == self.dest_column && self.source_index == self.dest_index
    }

    pub fn changes_column(&self) -> bool {
        self.source_column != self.dest_column
    }
}

/// One row of a reorder batch: `{id, position, column?}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderUpdate {
    pub id: TaskId,
    pub position: u32,
    #[serde(default, alias = "status", skip_serializing_if = "Option::is_none")]
    pub column: Option<Column>,
}

impl ReorderUpdate {
    /// Position change within the current column.
    pub fn new(id: TaskId, position: u32) -> Self {
        Self {
            id,
            position,
            column: None,
        }
    }

    /// Position change into another column.
    pub fn moved(id: TaskId, position: u32, column: Column) -> Self {
        Self {
            id,
            position,
            column: Some(column),
        }
    }
}

/// Ordered batch of updates produced by one move, applied atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReorderPlan {
    updates: Vec<ReorderUpdate>,
}

impl ReorderPlan {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReorderUpdate> {
        self.updates.iter()
    }

    pub fn updates(&self) -> &[ReorderUpdate] {
        &self.updates
    }
}

impl From<Vec<ReorderUpdate>> for ReorderPlan {
    fn from(updates: Vec<ReorderUpdate>) -> Self {
        Self { updates }
    }
}

impl<'a> IntoIterator for &'a ReorderPlan {
    type Item = &'a ReorderUpdate;
    type IntoIter = std::slice::Iter<'a, ReorderUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.iter()
    }
}

/// Compute the updates for `request` against the board's current state.
///
/// Plan order is: the moved task, then every destination task in rank
/// order, then the source tasks that follow the moved one (cross-column
/// moves only), each shifted up by one.
///
/// # Errors
/// Fails if the task is not in `source_column`, sits at a different index
/// than `source_index`, or if `dest_index` lies past the end of the
/// destination column.
pub fn plan_move(request: &MoveRequest, board: &KanbanBoard) -> Result<ReorderPlan, ReorderError> {
    if request.is_noop() {
        return Ok(ReorderPlan::empty());
    }

    let source = board.column(request.source_column);
    let actual = source
        .iter()
        .position(|t| t.id == request.task_id)
        .ok_or(ReorderError::TaskNotInColumn {
            task_id: request.task_id,
            column: request.source_column,
        })?;
    if actual != request.source_index {
        return Err(ReorderError::StaleSourceIndex {
            task_id: request.task_id,
            column: request.source_column,
            requested: request.source_index,
            actual,
        });
    }

    let remaining: Vec<TaskId> = board
        .column(request.dest_column)
        .iter()
        .filter(|t| t.id != request.task_id)
        .map(|t| t.id)
        .collect();
    if request.dest_index > remaining.len() {
        return Err(ReorderError::DestinationOutOfRange {
            column: request.dest_column,
            index: request.dest_index,
            len: remaining.len(),
        });
    }

    let mut updates = Vec::with_capacity(remaining.len() + source.len());
    updates.push(ReorderUpdate {
        id: request.task_id,
        position: request.dest_index as u32,
        column: request.changes_column().then_some(request.dest_column),
    });

    updates.extend(remaining.iter().enumerate().map(|(rank, &id)| {
        let position = if rank < request.dest_index { rank } else { rank + 1 };
        ReorderUpdate::new(id, position as u32)
    }));

    if request.changes_column() {
        updates.extend(
            source
                .iter()
                .enumerate()
                .skip(actual + 1)
                .map(|(rank, t)| ReorderUpdate::new(t.id, (rank - 1) as u32)),
        );
    }

    log::debug!(
        "planned move of task {} from {}#{} to {}#{}: {} update(s)",
        request.task_id,
        request.source_column,
        request.source_index,
        request.dest_column,
        request.dest_index,
        updates.len()
    );
    Ok(ReorderPlan::from(updates))
}
