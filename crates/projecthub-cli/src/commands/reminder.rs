//! Task reminders.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use projecthub_core::storage::TaskDb;

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Schedule a reminder for a task
    Add {
        /// Task ID
        task: i64,
        /// When to remind, RFC 3339 (e.g. 2024-06-10T09:00:00Z)
        #[arg(long)]
        at: DateTime<Utc>,
        /// Reminder text
        #[arg(long)]
        message: Option<String>,
    },
    /// List a task's reminders, soonest first
    List {
        /// Task ID
        task: i64,
    },
    /// Delete a reminder
    Delete {
        /// Reminder ID
        id: i64,
    },
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = TaskDb::open()?;

    match action {
        ReminderAction::Add { task, at, message } => {
            let reminder = db.create_reminder(task, at, message.as_deref())?;
            println!("Reminder created: {}", reminder.id);
            println!("{}", serde_json::to_string_pretty(&reminder)?);
        }
        ReminderAction::List { task } => {
            let reminders = db.list_reminders(task)?;
            println!("{}", serde_json::to_string_pretty(&reminders)?);
        }
        ReminderAction::Delete { id } => {
            db.delete_reminder(id)?;
            println!("Reminder deleted: {id}");
        }
    }
    Ok(())
}
