mod config;
pub mod migrations;
mod task_db;

pub use config::{CalendarConfig, Config, GanttConfig, KanbanConfig};
pub use task_db::{NewTask, TaskDb, TaskFilter};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/projecthub[-dev]/` based on PROJECTHUB_ENV.
///
/// Set PROJECTHUB_ENV=dev to use development data directory.
/// PROJECTHUB_DATA_DIR overrides the location entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PROJECTHUB_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("PROJECTHUB_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("projecthub-dev")
            } else {
                base_dir.join("projecthub")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
