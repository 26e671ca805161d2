//! SQLite-based storage for projects and tasks.
//!
//! Stands in for the remote task service: it keeps every column dense,
//! applies reorder batches in a single transaction and exposes a board
//! version counter for optimistic concurrency.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use indoc::indoc;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::collections::BTreeSet;
use std::path::Path;

use super::data_dir;
use super::migrations;
use crate::error::{CoreError, DatabaseError, ServiceError};
use crate::kanban::{Column, ReorderPlan, TaskService};
use crate::model::{
    default_project_color, Priority, Project, ProjectPatch, Reminder, Task, TaskId, TaskPatch,
};
use crate::timeline::shift_dependents;

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const TASK_COLUMNS: &str = "id, title, description, status, priority, color, start_date, due_date,
     completed_at, estimated_hours, parent_id, position, project_id, created_at, updated_at";

// === Helper Functions ===

fn format_naive(dt: &NaiveDateTime) -> String {
    dt.format(NAIVE_FORMAT).to_string()
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, NAIVE_FORMAT).ok()
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_datetime_opt(dt_str: Option<String>) -> Option<DateTime<Utc>> {
    dt_str
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Build a Task from a row selected with [`TASK_COLUMNS`].
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let status_str: String = row.get(3)?;
    let status = status_str.parse::<Column>().unwrap_or_else(|_| {
        log::warn!("unknown task status '{status_str}', treating as todo");
        Column::Todo
    });
    let priority_str: String = row.get(4)?;
    let priority = priority_str.parse::<Priority>().unwrap_or_default();

    let start_date: Option<String> = row.get(6)?;
    let due_date: Option<String> = row.get(7)?;
    let created_at: String = row.get(13)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status,
        priority,
        color: row.get(5)?,
        start_date: start_date.as_deref().and_then(parse_naive),
        due_date: due_date.as_deref().and_then(parse_naive),
        completed_at: parse_datetime_opt(row.get(8)?),
        estimated_hours: row.get(9)?,
        parent_id: row.get(10)?,
        position: row.get(11)?,
        project_id: row.get(12)?,
        dependencies: Vec::new(),
        created_at: parse_datetime_fallback(&created_at),
        updated_at: parse_datetime_opt(row.get(14)?),
    })
}

fn row_to_reminder(row: &rusqlite::Row) -> Result<Reminder, rusqlite::Error> {
    let remind_at: String = row.get(2)?;
    let created_at: String = row.get(5)?;
    Ok(Reminder {
        id: row.get(0)?,
        task_id: row.get(1)?,
        remind_at: parse_datetime_fallback(&remind_at),
        message: row.get(3)?,
        is_sent: row.get(4)?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// Fields for a task that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub project_id: i64,
    pub description: Option<String>,
    pub status: Option<Column>,
    pub priority: Priority,
    pub color: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
    pub estimated_hours: Option<f64>,
    pub parent_id: Option<TaskId>,
    pub dependencies: Vec<TaskId>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, project_id: i64) -> Self {
        Self {
            title: title.into(),
            project_id,
            ..Default::default()
        }
    }
}

/// Filter for [`TaskDb::list_tasks`]; empty matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub project_id: Option<i64>,
    pub status: Option<Column>,
}

/// SQLite database for projects and tasks.
pub struct TaskDb {
    conn: Connection,
}

impl TaskDb {
    /// Open the database at `~/.config/projecthub/projecthub.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let dir = data_dir().map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join("projecthub.db"))
    }

    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, DatabaseError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Projects ===

    /// # Errors
    /// Returns an error if the insert fails.
    pub fn create_project(
        &self,
        name: &str,
        description: Option<&str>,
        color: Option<&str>,
    ) -> Result<Project, DatabaseError> {
        let color = color.map_or_else(default_project_color, str::to_string);
        self.conn.execute(
            "INSERT INTO projects (name, description, color, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, description, color, Utc::now().to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        log::info!("created project {id} '{name}'");
        self.get_project(id)?
            .ok_or(DatabaseError::NotFound { entity: "project", id })
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_project(&self, id: i64) -> Result<Option<Project>, DatabaseError> {
        let sql = format!("{} WHERE p.id = ?1", Self::PROJECT_SELECT);
        Ok(self
            .conn
            .query_row(&sql, [id], Self::row_to_project)
            .optional()?)
    }

    /// Projects with their task counts, by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let sql = format!("{} ORDER BY p.id", Self::PROJECT_SELECT);
        let mut stmt = self.conn.prepare(&sql)?;
        let projects = stmt.query_map([], Self::row_to_project)?;
        Ok(projects.collect::<Result<_, _>>()?)
    }

    /// Apply `patch` to a stored project.
    ///
    /// # Errors
    /// Returns an error if the project does not exist or the update fails.
    pub fn update_project(&self, id: i64, patch: &ProjectPatch) -> Result<Project, DatabaseError> {
        let mut project = self
            .get_project(id)?
            .ok_or(DatabaseError::NotFound { entity: "project", id })?;
        project.apply(patch);
        self.conn.execute(
            "UPDATE projects SET name = ?1, description = ?2, color = ?3, is_archived = ?4 WHERE id = ?5",
            params![
                project.name,
                project.description,
                project.color,
                project.is_archived,
                id
            ],
        )?;
        log::info!("updated project {id}");
        Ok(project)
    }

    /// Delete a project together with its tasks and their reminders.
    ///
    /// # Errors
    /// Returns an error if the project does not exist or the delete fails.
    pub fn delete_project(&mut self, id: i64) -> Result<(), DatabaseError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM projects WHERE id = ?1", [id])?;
        if removed == 0 {
            return Err(DatabaseError::NotFound { entity: "project", id });
        }
        bump_version(&tx)?;
        tx.commit()?;
        log::info!("deleted project {id}");
        Ok(())
    }

    const PROJECT_SELECT: &'static str = indoc! {"
        SELECT p.id, p.name, p.description, p.color, p.is_archived,
               (SELECT COUNT(*) FROM tasks t WHERE t.project_id = p.id),
               (SELECT COUNT(*) FROM tasks t WHERE t.project_id = p.id AND t.status = 'done')
        FROM projects p"};

    fn row_to_project(row: &rusqlite::Row) -> Result<Project, rusqlite::Error> {
        Ok(Project {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            color: row.get(3)?,
            is_archived: row.get(4)?,
            task_count: row.get(5)?,
            completed_count: row.get(6)?,
        })
    }

    // === Tasks ===

    /// Insert a task at the end of its column.
    ///
    /// # Errors
    /// Returns an error if the project or a dependency does not exist, or
    /// the insert fails.
    pub fn create_task(&mut self, new: &NewTask) -> Result<Task, DatabaseError> {
        if self.get_project(new.project_id)?.is_none() {
            return Err(DatabaseError::NotFound {
                entity: "project",
                id: new.project_id,
            });
        }
        let status = new.status.unwrap_or(Column::Todo);
        let now = Utc::now();

        let tx = self.conn.transaction()?;
        let position = column_len(&tx, new.project_id, status)?;
        tx.execute(
            indoc! {"
                INSERT INTO tasks (title, description, status, priority, color, start_date,
                                   due_date, completed_at, estimated_hours, parent_id, position,
                                   project_id, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"},
            params![
                new.title,
                new.description,
                status.as_str(),
                new.priority.as_str(),
                new.color,
                new.start_date.as_ref().map(format_naive),
                new.due_date.as_ref().map(format_naive),
                (status == Column::Done).then(|| now.to_rfc3339()),
                new.estimated_hours,
                new.parent_id,
                position,
                new.project_id,
                now.to_rfc3339(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        for dep in &new.dependencies {
            tx.execute(
                "INSERT INTO task_dependencies (task_id, depends_on_id) VALUES (?1, ?2)",
                params![id, dep],
            )?;
        }
        bump_version(&tx)?;
        tx.commit()?;

        log::info!("created task {id} in {status}#{position}");
        self.get_task(id)?
            .ok_or(DatabaseError::NotFound { entity: "task", id })
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>, DatabaseError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        let task = self.conn.query_row(&sql, [id], row_to_task).optional()?;
        match task {
            Some(mut task) => {
                task.dependencies = self.load_dependencies(task.id)?;
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    /// Tasks matching `filter`, ordered by position within each column.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, DatabaseError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE (?1 IS NULL OR project_id = ?1) AND (?2 IS NULL OR status = ?2)
             ORDER BY project_id, position, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![filter.project_id, filter.status.map(|s| s.as_str())],
            row_to_task,
        )?;
        let mut tasks = rows.collect::<Result<Vec<_>, _>>()?;
        for task in &mut tasks {
            task.dependencies = self.load_dependencies(task.id)?;
        }
        Ok(tasks)
    }

    fn load_dependencies(&self, id: TaskId) -> Result<Vec<TaskId>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT depends_on_id FROM task_dependencies WHERE task_id = ?1 ORDER BY depends_on_id",
        )?;
        let deps = stmt.query_map([id], |row| row.get(0))?;
        Ok(deps.collect::<Result<_, _>>()?)
    }

    /// Apply `patch` to a stored task.
    ///
    /// A status change moves the task to the end of its new column and
    /// closes the gap it left.
    ///
    /// # Errors
    /// Returns an error if the task does not exist or the update fails.
    pub fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task, DatabaseError> {
        let mut task = self
            .get_task(id)?
            .ok_or(DatabaseError::NotFound { entity: "task", id })?;
        let old_status = task.status;
        let old_position = task.position;
        task.apply(patch, Utc::now());

        let tx = self.conn.transaction()?;
        if task.status != old_status {
            task.position = column_len(&tx, task.project_id, task.status)?;
        }
        tx.execute(
            indoc! {"
                UPDATE tasks
                SET title = ?1, description = ?2, status = ?3, priority = ?4, color = ?5,
                    start_date = ?6, due_date = ?7, completed_at = ?8, estimated_hours = ?9,
                    position = ?10, updated_at = ?11
                WHERE id = ?12"},
            params![
                task.title,
                task.description,
                task.status.as_str(),
                task.priority.as_str(),
                task.color,
                task.start_date.as_ref().map(format_naive),
                task.due_date.as_ref().map(format_naive),
                task.completed_at.map(|dt| dt.to_rfc3339()),
                task.estimated_hours,
                task.position,
                task.updated_at.map(|dt| dt.to_rfc3339()),
                id,
            ],
        )?;
        if task.status != old_status {
            close_gap(&tx, task.project_id, old_status, old_position)?;
            bump_version(&tx)?;
        }
        tx.commit()?;
        Ok(task)
    }

    /// Delete a task and compact its column.
    ///
    /// # Errors
    /// Returns an error if the task does not exist or the delete fails.
    pub fn delete_task(&mut self, id: TaskId) -> Result<(), DatabaseError> {
        let task = self
            .get_task(id)?
            .ok_or(DatabaseError::NotFound { entity: "task", id })?;
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        close_gap(&tx, task.project_id, task.status, task.position)?;
        bump_version(&tx)?;
        tx.commit()?;
        log::info!("deleted task {id}");
        Ok(())
    }

    /// Move a task's due date to `new_due` and shift its dependents by the
    /// same delta, all in one transaction. Returns the adjusted ids,
    /// starting with `id`.
    ///
    /// # Errors
    /// Returns a validation error if the task is unknown or has no due
    /// date, and a database error if the write fails.
    pub fn adjust_dates(&mut self, id: TaskId, new_due: NaiveDateTime) -> Result<Vec<TaskId>, CoreError> {
        // Dependencies may cross projects, so the whole graph is loaded.
        let mut tasks = self.list_tasks(&TaskFilter::default())?;
        let adjusted = shift_dependents(&mut tasks, id, new_due)?;

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        for task in tasks.iter().filter(|t| adjusted.contains(&t.id)) {
            tx.execute(
                "UPDATE tasks SET start_date = ?1, due_date = ?2, updated_at = ?3 WHERE id = ?4",
                params![
                    task.start_date.as_ref().map(format_naive),
                    task.due_date.as_ref().map(format_naive),
                    now,
                    task.id
                ],
            )?;
        }
        tx.commit()?;
        log::info!("adjusted dates of {} task(s) from task {id}", adjusted.len());
        Ok(adjusted)
    }

    // === Reminders ===

    /// # Errors
    /// Returns an error if the task does not exist or the insert fails.
    pub fn create_reminder(
        &self,
        task_id: TaskId,
        remind_at: DateTime<Utc>,
        message: Option<&str>,
    ) -> Result<Reminder, DatabaseError> {
        if self.get_task(task_id)?.is_none() {
            return Err(DatabaseError::NotFound { entity: "task", id: task_id });
        }
        self.conn.execute(
            "INSERT INTO reminders (task_id, remind_at, message, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                task_id,
                remind_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                message,
                Utc::now().to_rfc3339()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        log::info!("created reminder {id} for task {task_id}");
        self.conn
            .query_row(
                "SELECT id, task_id, remind_at, message, is_sent, created_at FROM reminders WHERE id = ?1",
                [id],
                row_to_reminder,
            )
            .optional()?
            .ok_or(DatabaseError::NotFound { entity: "reminder", id })
    }

    /// Reminders of a task, soonest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_reminders(&self, task_id: TaskId) -> Result<Vec<Reminder>, DatabaseError> {
        let mut stmt = self.conn.prepare(indoc! {"
            SELECT id, task_id, remind_at, message, is_sent, created_at
            FROM reminders WHERE task_id = ?1
            ORDER BY remind_at, id"})?;
        let reminders = stmt.query_map([task_id], row_to_reminder)?;
        Ok(reminders.collect::<Result<_, _>>()?)
    }

    /// # Errors
    /// Returns an error if the reminder does not exist or the delete fails.
    pub fn delete_reminder(&self, id: i64) -> Result<(), DatabaseError> {
        let removed = self.conn.execute("DELETE FROM reminders WHERE id = ?1", [id])?;
        if removed == 0 {
            return Err(DatabaseError::NotFound { entity: "reminder", id });
        }
        Ok(())
    }

    /// Monotonic counter bumped by every change to positions or columns.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn board_version(&self) -> Result<u64, DatabaseError> {
        Ok(read_version(&self.conn)?)
    }

    /// Apply a reorder batch atomically.
    ///
    /// When `expected_version` is given, the batch is refused unless the
    /// stored board is still at that version. Every touched column must be
    /// dense afterwards, otherwise nothing is written. Returns the new
    /// board version.
    ///
    /// # Errors
    /// Returns [`ServiceError::VersionConflict`] on a stale version,
    /// [`ServiceError::Rejected`] when the result would not be dense, and
    /// [`ServiceError::Database`] for unknown tasks or SQL failures.
    pub fn apply_reorder_checked(
        &mut self,
        plan: &ReorderPlan,
        expected_version: Option<u64>,
    ) -> Result<u64, ServiceError> {
        let tx = self.conn.transaction()?;
        let actual = read_version(&tx)?;
        if let Some(expected) = expected_version {
            if expected != actual {
                return Err(ServiceError::VersionConflict { expected, actual });
            }
        }

        let now = Utc::now().to_rfc3339();
        let mut touched = BTreeSet::new();
        for update in plan {
            let current: Option<(i64, String)> = tx
                .query_row(
                    "SELECT project_id, status FROM tasks WHERE id = ?1",
                    [update.id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            let (project_id, status) = current.ok_or(DatabaseError::NotFound {
                entity: "task",
                id: update.id,
            })?;
            touched.insert((project_id, status));

            match update.column {
                Some(column) => {
                    tx.execute(
                        indoc! {"
                            UPDATE tasks
                            SET position = ?1,
                                completed_at = CASE
                                    WHEN ?2 = 'done' AND status != 'done' THEN ?3
                                    WHEN ?2 != 'done' THEN NULL
                                    ELSE completed_at END,
                                status = ?2,
                                updated_at = ?3
                            WHERE id = ?4"},
                        params![update.position, column.as_str(), now, update.id],
                    )?;
                    touched.insert((project_id, column.as_str().to_string()));
                }
                None => {
                    tx.execute(
                        "UPDATE tasks SET position = ?1 WHERE id = ?2",
                        params![update.position, update.id],
                    )?;
                }
            }
        }

        for (project_id, status) in &touched {
            let positions = column_positions(&tx, *project_id, status)?;
            let dense = positions.iter().enumerate().all(|(i, &p)| p as usize == i);
            if !dense {
                return Err(ServiceError::Rejected(format!(
                    "column '{status}' of project {project_id} would not be dense: {positions:?}"
                )));
            }
        }

        let version = bump_version(&tx)?;
        tx.commit()?;
        log::info!("applied reorder batch of {} update(s), board version {version}", plan.len());
        Ok(version)
    }
}

impl TaskService for TaskDb {
    fn apply_reorder(&mut self, plan: &ReorderPlan) -> Result<(), ServiceError> {
        self.apply_reorder_checked(plan, None).map(|_| ())
    }
}

fn column_len(tx: &Transaction, project_id: i64, status: Column) -> Result<u32, rusqlite::Error> {
    tx.query_row(
        "SELECT COUNT(*) FROM tasks WHERE project_id = ?1 AND status = ?2",
        params![project_id, status.as_str()],
        |row| row.get(0),
    )
}

fn column_positions(
    tx: &Transaction,
    project_id: i64,
    status: &str,
) -> Result<Vec<u32>, rusqlite::Error> {
    let mut stmt = tx.prepare(
        "SELECT position FROM tasks WHERE project_id = ?1 AND status = ?2 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![project_id, status], |row| row.get(0))?;
    rows.collect()
}

fn close_gap(
    tx: &Transaction,
    project_id: i64,
    status: Column,
    removed_position: u32,
) -> Result<(), rusqlite::Error> {
    tx.execute(
        "UPDATE tasks SET position = position - 1
         WHERE project_id = ?1 AND status = ?2 AND position > ?3",
        params![project_id, status.as_str(), removed_position],
    )?;
    Ok(())
}

fn read_version(conn: &Connection) -> Result<u64, rusqlite::Error> {
    let version: i64 = conn.query_row("SELECT version FROM board_meta WHERE id = 1", [], |row| {
        row.get(0)
    })?;
    Ok(version as u64)
}

fn bump_version(tx: &Transaction) -> Result<u64, rusqlite::Error> {
    tx.execute("UPDATE board_meta SET version = version + 1 WHERE id = 1", [])?;
    read_version(tx)
}
