//! In-memory board: tasks grouped by column and ordered by position.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::{Column, ReorderPlan, WipLimits};
use crate::error::ReorderError;
use crate::model::{Task, TaskId};

/// Tasks grouped into the five columns, each sorted by position.
#[derive(Debug, Clone, PartialEq)]
pub struct KanbanBoard {
    columns: [Vec<Task>; 5],
    wip: WipLimits,
}

/// Read-only view of one column, as rendered.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnView<'a> {
    pub column: Column,
    pub title: &'static str,
    pub tasks: &'a [Task],
    pub wip_limit: Option<usize>,
}

impl ColumnView<'_> {
    pub fn over_limit(&self) -> bool {
        self.wip_limit.is_some_and(|limit| self.tasks.len() > limit)
    }
}

impl KanbanBoard {
    /// Group `tasks` by column.
    ///
    /// Within a column tasks are ordered by position; equal positions keep
    /// their input order.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut columns: [Vec<Task>; 5] = Default::default();
        for task in tasks {
            columns[task.status.index()].push(task);
        }
        for column in &mut columns {
            column.sort_by_key(|t| t.position);
        }
        Self {
            columns,
            wip: WipLimits::default(),
        }
    }

    /// One board per project, by ascending project id.
    ///
    /// Positions are only dense within a project, so tasks of different
    /// projects never share a board.
    pub fn per_project(tasks: impl IntoIterator<Item = Task>) -> Vec<(i64, Self)> {
        let mut grouped: BTreeMap<i64, Vec<Task>> = BTreeMap::new();
        for task in tasks {
            grouped.entry(task.project_id).or_default().push(task);
        }
        grouped
            .into_iter()
            .map(|(project_id, tasks)| (project_id, Self::from_tasks(tasks)))
            .collect()
    }

    pub fn with_wip_limits(mut self, wip: WipLimits) -> Self {
        self.wip = wip;
        self
    }

    /// Tasks in `column`, by ascending position.
    pub fn column(&self, column: Column) -> &[Task] {
        &self.columns[column.index()]
    }

    pub fn columns(&self) -> Vec<ColumnView<'_>> {
        Column::all()
            .into_iter()
            .map(|column| ColumnView {
                column,
                title: column.title(),
                tasks: self.column(column),
                wip_limit: self.wip.limit(column),
            })
            .collect()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks().find(|t| t.id == id)
    }

    /// Column and index of a task.
    pub fn locate(&self, id: TaskId) -> Option<(Column, usize)> {
        Column::all().into_iter().find_map(|column| {
            self.column(column)
                .iter()
                .position(|t| t.id == id)
                .map(|index| (column, index))
        })
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.columns.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.columns.into_iter().flatten().collect()
    }

    /// Verify every column holds positions `0..n` exactly once.
    pub fn check_dense(&self) -> Result<(), ReorderError> {
        for column in Column::all() {
            let positions: Vec<u32> = self.column(column).iter().map(|t| t.position).collect();
            let dense = positions
                .iter()
                .enumerate()
                .all(|(rank, &pos)| pos as usize == rank);
            if !dense {
                return Err(ReorderError::NotDense { column, positions });
            }
        }
        Ok(())
    }

    /// Apply a plan to the local tasks.
    ///
    /// All ids are checked before anything changes, so an error leaves the
    /// board untouched. Column changes go through [`Task::set_status`].
    pub fn apply(&mut self, plan: &ReorderPlan, now: DateTime<Utc>) -> Result<(), ReorderError> {
        if let Some(missing) = plan.iter().find(|u| self.task(u.id).is_none()) {
            return Err(ReorderError::UnknownTask(missing.id));
        }

        let mut tasks = std::mem::take(&mut self.columns)
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        for update in plan.iter() {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == update.id) {
                task.position = update.position;
                if let Some(column) = update.column {
                    task.set_status(column, now);
                }
            }
        }

        let wip = self.wip;
        *self = Self::from_tasks(tasks).with_wip_limits(wip);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanban::ReorderUpdate;
    use chrono::TimeZone;

    fn task(id: TaskId, column: Column, position: u32) -> Task {
        Task::new(id, format!("task {id}"), 1).with_status(column, position)
    }

    #[test]
    fn groups_and_sorts_by_position() {
        let board = KanbanBoard::from_tasks(vec![
            task(1, Column::Todo, 1),
            task(2, Column::Done, 0),
            task(3, Column::Todo, 0),
        ]);
        let ids: Vec<_> = board.column(Column::Todo).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(board.locate(2), Some((Column::Done, 0)));
        assert_eq!(board.len(), 3);
        assert!(board.check_dense().is_ok());
    }

    #[test]
    fn equal_positions_keep_input_order() {
        let board = KanbanBoard::from_tasks(vec![
            task(5, Column::Review, 0),
            task(4, Column::Review, 0),
        ]);
        let ids: Vec<_> = board.column(Column::Review).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 4]);
        assert!(matches!(
            board.check_dense(),
            Err(ReorderError::NotDense { column: Column::Review, .. })
        ));
    }

    #[test]
    fn per_project_boards_stay_dense() {
        let tasks = vec![
            Task::new(1, "a", 2).with_status(Column::Todo, 0),
            Task::new(2, "b", 1).with_status(Column::Todo, 0),
            Task::new(3, "c", 2).with_status(Column::Todo, 1),
        ];
        assert!(KanbanBoard::from_tasks(tasks.clone()).check_dense().is_err());

        let boards = KanbanBoard::per_project(tasks);
        let ids: Vec<_> = boards.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2]);
        for (_, board) in &boards {
            assert!(board.check_dense().is_ok());
        }
        assert_eq!(boards[1].1.len(), 2);
    }

    #[test]
    fn column_views_report_wip_overflow() {
        let board = KanbanBoard::from_tasks((0..4).map(|i| task(i, Column::InProgress, i as u32)));
        let views = board.columns();
        assert_eq!(views.len(), 5);
        let in_progress = &views[2];
        assert_eq!(in_progress.title, "In Progress");
        assert!(in_progress.over_limit());
        assert!(!views[0].over_limit());
    }

    #[test]
    fn apply_rejects_unknown_ids_without_changes() {
        let mut board = KanbanBoard::from_tasks(vec![task(1, Column::Todo, 0)]);
        let before = board.clone();
        let plan = ReorderPlan::from(vec![
            ReorderUpdate::new(1, 3),
            ReorderUpdate::new(99, 0),
        ]);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(board.apply(&plan, now), Err(ReorderError::UnknownTask(99)));
        assert_eq!(board, before);
    }

    #[test]
    fn apply_moves_task_and_stamps_completion() {
        let mut board = KanbanBoard::from_tasks(vec![task(1, Column::Todo, 0)]);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let plan = ReorderPlan::from(vec![ReorderUpdate::moved(1, 0, Column::Done)]);
        board.apply(&plan, now).unwrap();
        assert!(board.column(Column::Todo).is_empty());
        assert_eq!(board.column(Column::Done)[0].completed_at, Some(now));
    }
}
