//! Dashboard summary for one project or all of them.

use projecthub_core::dashboard::{dashboard_stats, high_priority_open_tasks, recent_open_tasks};
use projecthub_core::storage::{TaskDb, TaskFilter};
use serde_json::json;

use super::today;

const LIST_LIMIT: usize = 5;

pub fn run(project: Option<i64>) -> Result<(), Box<dyn std::error::Error>> {
    let db = TaskDb::open()?;
    if let Some(id) = project {
        db.get_project(id)?
            .ok_or_else(|| format!("project not found: {id}"))?;
    }
    let tasks = db.list_tasks(&TaskFilter {
        project_id: project,
        status: None,
    })?;

    let summary = json!({
        "stats": serde_json::to_value(dashboard_stats(&tasks, today()))?,
        "recent": serde_json::to_value(recent_open_tasks(&tasks, LIST_LIMIT))?,
        "high_priority": serde_json::to_value(high_priority_open_tasks(&tasks, LIST_LIMIT))?,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
