//! Database schema migrations for projecthub.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use indoc::indoc;
use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 3;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v3(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            log::warn!("failed to read schema_version: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: projects and tasks.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(indoc! {"
        CREATE TABLE IF NOT EXISTS projects (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            description     TEXT,
            color           TEXT NOT NULL DEFAULT '#6366F1',
            is_archived     INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            title           TEXT NOT NULL,
            description     TEXT,
            status          TEXT NOT NULL DEFAULT 'todo',
            priority        TEXT NOT NULL DEFAULT 'medium',
            color           TEXT,
            start_date      TEXT,
            due_date        TEXT,
            completed_at    TEXT,
            estimated_hours REAL,
            parent_id       INTEGER REFERENCES tasks(id) ON DELETE SET NULL,
            position        INTEGER NOT NULL DEFAULT 0,
            project_id      INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            created_at      TEXT NOT NULL,
            updated_at      TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_project_status_position
            ON tasks(project_id, status, position);
    "})?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: task dependencies and the board version counter.
///
/// The counter is bumped by every reorder batch and guards against
/// applying a plan computed from a stale board.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(indoc! {"
        CREATE TABLE IF NOT EXISTS task_dependencies (
            task_id         INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            depends_on_id   INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            PRIMARY KEY (task_id, depends_on_id)
        );

        CREATE TABLE IF NOT EXISTS board_meta (
            id              INTEGER PRIMARY KEY CHECK (id = 1),
            version         INTEGER NOT NULL
        );

        INSERT OR IGNORE INTO board_meta (id, version) VALUES (1, 0);
    "})?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

/// Migration v3: task reminders.
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(indoc! {"
        CREATE TABLE IF NOT EXISTS reminders (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            task_id         INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            remind_at       TEXT NOT NULL,
            message         TEXT,
            is_sent         INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_reminders_task ON reminders(task_id, remind_at);
    "})?;
    set_schema_version(&tx, 3)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);

        let version: i64 = conn
            .query_row("SELECT version FROM board_meta WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 0);
    }

    #[test]
    fn test_migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM board_meta", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_incremental_migration() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute(
            "INSERT INTO projects (name, created_at) VALUES ('Alpha', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        assert_eq!(get_schema_version(&conn), 1);

        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        let names: String = conn
            .query_row("SELECT name FROM projects", [], |row| row.get(0))
            .unwrap();
        assert_eq!(names, "Alpha");
        conn.prepare("SELECT task_id, depends_on_id FROM task_dependencies")
            .unwrap();
        conn.prepare("SELECT task_id, remind_at, is_sent FROM reminders")
            .unwrap();
    }
}
