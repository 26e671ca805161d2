//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use projecthub_core::kanban::Column;
use projecthub_core::model::{Priority, TaskPatch};
use projecthub_core::storage::{NewTask, TaskDb, TaskFilter};

use super::at_midnight;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Project ID the task belongs to
        #[arg(long)]
        project: i64,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Initial column (default: todo)
        #[arg(long)]
        status: Option<Column>,
        /// Priority: low, medium, high or urgent
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Bar color, e.g. "#10B981"
        #[arg(long)]
        color: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Estimated hours
        #[arg(long)]
        estimate: Option<f64>,
        /// Parent task ID
        #[arg(long)]
        parent: Option<i64>,
        /// Comma-separated IDs of tasks this one depends on
        #[arg(long, value_delimiter = ',')]
        depends_on: Vec<i64>,
    },
    /// List tasks
    List {
        /// Filter by project ID
        #[arg(long)]
        project: Option<i64>,
        /// Filter by column
        #[arg(long)]
        status: Option<Column>,
    },
    /// Get task details
    Get {
        /// Task ID
        id: i64,
    },
    /// Update a task
    Update {
        /// Task ID
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Move to this column (appended at the end)
        #[arg(long)]
        status: Option<Column>,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
        /// New color
        #[arg(long)]
        color: Option<String>,
        /// New start date
        #[arg(long)]
        start: Option<NaiveDate>,
        /// New due date
        #[arg(long)]
        due: Option<NaiveDate>,
        /// New estimate in hours
        #[arg(long)]
        estimate: Option<f64>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },
    /// Move the due date and shift every dependent task by the same amount
    AdjustDates {
        /// Task ID
        id: i64,
        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: NaiveDate,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = TaskDb::open()?;

    match action {
        TaskAction::Create {
            title,
            project,
            description,
            status,
            priority,
            color,
            start,
            due,
            estimate,
            parent,
            depends_on,
        } => {
            let new = NewTask {
                description,
                status,
                priority,
                color,
                start_date: start.map(at_midnight),
                due_date: due.map(at_midnight),
                estimated_hours: estimate,
                parent_id: parent,
                dependencies: depends_on,
                ..NewTask::new(title, project)
            };
            let task = db.create_task(&new)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { project, status } => {
            let tasks = db.list_tasks(&TaskFilter {
                project_id: project,
                status,
            })?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Get { id } => match db.get_task(id)? {
            Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
            None => return Err(format!("task not found: {id}").into()),
        },
        TaskAction::Update {
            id,
            title,
            description,
            status,
            priority,
            color,
            start,
            due,
            estimate,
        } => {
            let patch = TaskPatch {
                title,
                description,
                status,
                priority,
                color,
                start_date: start.map(at_midnight),
                due_date: due.map(at_midnight),
                estimated_hours: estimate,
            };
            if patch.is_empty() {
                return Err("nothing to update".into());
            }
            let task = db.update_task(id, &patch)?;
            println!("Task updated: {id}");
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Delete { id } => {
            db.delete_task(id)?;
            println!("Task deleted: {id}");
        }
        TaskAction::AdjustDates { id, due } => {
            let adjusted = db.adjust_dates(id, at_midnight(due))?;
            println!("Adjusted {} task(s)", adjusted.len());
            println!("{}", serde_json::to_string_pretty(&adjusted)?);
        }
    }
    Ok(())
}
