//! Kanban commands: print a board and move cards.

use std::collections::HashMap;

use chrono::Utc;
use clap::Subcommand;
use projecthub_core::kanban::{commit_move, Column, KanbanBoard, MoveRequest};
use projecthub_core::storage::{Config, TaskDb, TaskFilter};
use projecthub_core::Event;
use serde_json::json;

#[derive(Subcommand)]
pub enum KanbanAction {
    /// Show the board of a project
    Board {
        /// Project ID (default: one board per project)
        #[arg(long)]
        project: Option<i64>,
        /// Print the columns as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move a task to a column and index
    Move {
        /// Task ID
        id: i64,
        /// Destination column
        #[arg(long)]
        to: Column,
        /// Destination index within the column
        #[arg(long)]
        index: usize,
    },
}

pub fn run(action: KanbanAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        KanbanAction::Board { project, json } => {
            let db = TaskDb::open()?;
            let names: HashMap<i64, String> = db
                .list_projects()?
                .into_iter()
                .map(|p| (p.id, p.name))
                .collect();
            let tasks = db.list_tasks(&TaskFilter {
                project_id: project,
                status: None,
            })?;
            // Positions are dense per project, so each project gets its own board.
            let boards = match project {
                Some(id) if !names.contains_key(&id) => {
                    return Err(format!("project not found: {id}").into());
                }
                Some(id) => vec![(id, KanbanBoard::from_tasks(tasks))],
                None => KanbanBoard::per_project(tasks),
            };

            if json {
                let mut out = Vec::with_capacity(boards.len());
                for (id, board) in boards {
                    let board = board.with_wip_limits(config.wip_limits());
                    out.push(json!({
                        "project_id": id,
                        "project": names.get(&id),
                        "columns": serde_json::to_value(board.columns())?,
                    }));
                }
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }
            if boards.is_empty() {
                println!("(no tasks)");
            }
            for (id, board) in boards {
                let board = board.with_wip_limits(config.wip_limits());
                let name = names.get(&id).map_or("?", String::as_str);
                println!("== {name} (#{id}) ==");
                print!("{}", render_board(&board));
            }
        }
        KanbanAction::Move { id, to, index } => {
            let mut db = TaskDb::open()?;
            let task = db
                .get_task(id)?
                .ok_or_else(|| format!("task not found: {id}"))?;

            // Positions are dense per project, so the board is the task's project.
            let tasks = db.list_tasks(&TaskFilter {
                project_id: Some(task.project_id),
                status: None,
            })?;
            let mut board = KanbanBoard::from_tasks(tasks).with_wip_limits(config.wip_limits());
            let (source_column, source_index) = board
                .locate(id)
                .ok_or_else(|| format!("task {id} is not on its project board"))?;

            let request = MoveRequest {
                task_id: id,
                source_column,
                source_index,
                dest_column: to,
                dest_index: index,
            };
            let mut events: Vec<Event> = Vec::new();
            let plan = commit_move(&mut board, &request, &mut db, &mut events, Utc::now())?;

            for event in &events {
                log::info!("{}", serde_json::to_string(event)?);
            }
            if plan.is_empty() {
                println!("Nothing to move");
            } else {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            }
        }
    }
    Ok(())
}

fn render_board(board: &KanbanBoard) -> String {
    let mut out = String::new();
    for view in board.columns() {
        let limit = match view.wip_limit {
            Some(limit) => format!("{}/{limit}", view.tasks.len()),
            None => view.tasks.len().to_string(),
        };
        let warning = if view.over_limit() { "  over WIP limit" } else { "" };
        out.push_str(&format!("{} ({limit}){warning}\n", view.title));
        for task in view.tasks {
            out.push_str(&format!(
                "  {:>2}. #{} {} [{}]\n",
                task.position, task.id, task.title, task.priority
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use projecthub_core::Task;

    #[test]
    fn board_lists_cards_by_position() {
        let board = KanbanBoard::from_tasks(vec![
            Task::new(2, "second", 1).with_status(Column::Todo, 1),
            Task::new(1, "first", 1).with_status(Column::Todo, 0),
        ]);
        let text = render_board(&board);
        let todo: Vec<&str> = text.lines().skip_while(|l| !l.starts_with("To Do")).take(3).collect();
        assert_eq!(todo[1].trim(), "0. #1 first [medium]");
        assert_eq!(todo[2].trim(), "1. #2 second [medium]");
    }
}
