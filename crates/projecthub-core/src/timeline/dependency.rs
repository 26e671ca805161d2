//! Shifting dependent tasks when a due date moves.

use chrono::NaiveDateTime;
use std::collections::{HashSet, VecDeque};

use crate::error::ValidationError;
use crate::model::{Task, TaskId};

/// Move `task_id`'s due date to `new_due` and drag its dependents along.
///
/// The task's start date moves by the same delta. Every task that depends
/// on it, directly or transitively, has both dates shifted by that delta
/// exactly once. Returns the adjusted ids in visiting order, starting with
/// `task_id`.
///
/// # Errors
/// [`ValidationError::UnknownTask`] if `task_id` is absent, or
/// [`ValidationError::InvalidValue`] if it has no due date to shift from.
pub fn shift_dependents(
    tasks: &mut [Task],
    task_id: TaskId,
    new_due: NaiveDateTime,
) -> Result<Vec<TaskId>, ValidationError> {
    let root = tasks
        .iter_mut()
        .find(|t| t.id == task_id)
        .ok_or(ValidationError::UnknownTask(task_id))?;
    let old_due = root.due_date.ok_or_else(|| ValidationError::InvalidValue {
        field: "due_date".to_string(),
        message: format!("task {task_id} has no due date"),
    })?;

    let delta = new_due - old_due;
    root.due_date = Some(new_due);
    root.start_date = root.start_date.map(|s| s + delta);

    let mut adjusted = vec![task_id];
    let mut seen: HashSet<TaskId> = HashSet::from([task_id]);
    let mut queue: VecDeque<TaskId> = dependents_of(tasks, task_id).collect();

    while let Some(id) = queue.pop_front() {
        if !seen.insert(id) {
            continue;
        }
        if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
            task.start_date = task.start_date.map(|s| s + delta);
            task.due_date = task.due_date.map(|d| d + delta);
        }
        adjusted.push(id);
        queue.extend(dependents_of(tasks, id));
    }

    log::debug!(
        "shifted {} task(s) by {} day(s) from task {}",
        adjusted.len(),
        delta.num_days(),
        task_id
    );
    Ok(adjusted)
}

fn dependents_of(tasks: &[Task], id: TaskId) -> impl Iterator<Item = TaskId> + '_ {
    tasks
        .iter()
        .filter(move |t| t.dependencies.contains(&id))
        .map(|t| t.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn june(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn at(d: u32) -> NaiveDateTime {
        june(d).and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn shifts_chain_of_dependents() {
        let mut tasks = vec![
            Task::new(1, "design", 1).with_dates(Some(june(1)), Some(june(5))),
            Task::new(2, "build", 1)
                .with_dates(Some(june(6)), Some(june(10)))
                .with_dependencies([1]),
            Task::new(3, "test", 1)
                .with_dates(Some(june(11)), None)
                .with_dependencies([2]),
            Task::new(4, "unrelated", 1).with_dates(Some(june(1)), Some(june(2))),
        ];

        let adjusted = shift_dependents(&mut tasks, 1, at(8)).unwrap();

        assert_eq!(adjusted, vec![1, 2, 3]);
        assert_eq!(tasks[0].start_date, Some(at(4)));
        assert_eq!(tasks[0].due_date, Some(at(8)));
        assert_eq!(tasks[1].start_date, Some(at(9)));
        assert_eq!(tasks[1].due_date, Some(at(13)));
        assert_eq!(tasks[2].start_date, Some(at(14)));
        assert_eq!(tasks[2].due_date, None);
        assert_eq!(tasks[3].due_date, Some(at(2)));
    }

    #[test]
    fn diamond_dependents_shift_once() {
        let mut tasks = vec![
            Task::new(1, "root", 1).with_dates(None, Some(june(5))),
            Task::new(2, "left", 1).with_dates(None, Some(june(7))).with_dependencies([1]),
            Task::new(3, "right", 1).with_dates(None, Some(june(7))).with_dependencies([1]),
            Task::new(4, "join", 1).with_dates(None, Some(june(9))).with_dependencies([2, 3]),
        ];

        let adjusted = shift_dependents(&mut tasks, 1, at(3)).unwrap();

        assert_eq!(adjusted, vec![1, 2, 3, 4]);
        assert_eq!(tasks[3].due_date, Some(at(7)));
    }

    #[test]
    fn cycles_terminate() {
        let mut tasks = vec![
            Task::new(1, "a", 1).with_dates(None, Some(june(5))).with_dependencies([2]),
            Task::new(2, "b", 1).with_dates(None, Some(june(6))).with_dependencies([1]),
        ];
        let adjusted = shift_dependents(&mut tasks, 1, at(6)).unwrap();
        assert_eq!(adjusted, vec![1, 2]);
        assert_eq!(tasks[1].due_date, Some(at(7)));
    }

    #[test]
    fn rejects_unknown_or_undated_task() {
        let mut tasks = vec![Task::new(1, "undated", 1)];
        assert_eq!(
            shift_dependents(&mut tasks, 9, at(1)).unwrap_err(),
            ValidationError::UnknownTask(9)
        );
        assert!(matches!(
            shift_dependents(&mut tasks, 1, at(1)).unwrap_err(),
            ValidationError::InvalidValue { .. }
        ));
    }
}
