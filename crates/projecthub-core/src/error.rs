//! Core error types for projecthub-core.
//!
//! Every fallible operation in the library reports one of the enums below,
//! wrapped in [`CoreError`] at module boundaries.

use std::path::PathBuf;
use thiserror::Error;

use crate::kanban::Column;
use crate::model::TaskId;

/// Core error type for projecthub-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A move request that does not match the current board
    #[error("Reorder error: {0}")]
    Reorder(#[from] ReorderError),

    /// The persistence service rejected a write
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Row not found
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Window or range whose end precedes its start
    #[error("Invalid date range: end ({end}) precedes start ({start})")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Referenced task does not exist
    #[error("Unknown task {0}")]
    UnknownTask(TaskId),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised while planning or applying a kanban move.
///
/// Each of these means the caller's view of the board is stale or the
/// request is malformed; planning never guesses its way past them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    #[error("task {task_id} is not in column '{column}'")]
    TaskNotInColumn { task_id: TaskId, column: Column },

    #[error("task {task_id} is at index {actual} in '{column}', not {requested}")]
    StaleSourceIndex {
        task_id: TaskId,
        column: Column,
        requested: usize,
        actual: usize,
    },

    #[error("destination index {index} exceeds length {len} of column '{column}'")]
    DestinationOutOfRange {
        column: Column,
        index: usize,
        len: usize,
    },

    #[error("column '{column}' positions are not dense: {positions:?}")]
    NotDense { column: Column, positions: Vec<u32> },

    #[error("plan references unknown task {0}")]
    UnknownTask(TaskId),
}

/// Errors reported by a [`TaskService`](crate::kanban::TaskService).
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The stored board changed since the plan was computed
    #[error("board version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    /// The service refused the batch
    #[error("reorder rejected: {0}")]
    Rejected(String),

    /// Backing store failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(err: rusqlite::Error) -> Self {
        ServiceError::Database(err.into())
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
