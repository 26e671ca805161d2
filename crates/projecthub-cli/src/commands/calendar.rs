//! Calendar commands: month grid, per-day entries, upcoming deadlines.

use std::collections::HashMap;

use chrono::NaiveDate;
use clap::Subcommand;
use projecthub_core::calendar::{
    bucket_by_day, filter_in_range, upcoming_deadlines, CalendarGrid, MonthNavigator, WeekStart,
};
use projecthub_core::model::{CalendarEvent, Project};
use projecthub_core::storage::{Config, TaskDb, TaskFilter};
use projecthub_core::{Event, View};

use super::{parse_month, today};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Print the month grid
    Grid {
        /// Month to show (YYYY-MM, default: current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,
        /// First day of the week (sun, mon, ...)
        #[arg(long)]
        week_start: Option<WeekStart>,
        /// Print the grid dates as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show task entries for each day of the month
    Show {
        /// Month to show (YYYY-MM, default: current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,
        /// Months to step forward (negative steps back)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,
        /// Only tasks of this project
        #[arg(long)]
        project: Option<i64>,
    },
    /// List unfinished tasks due soon
    Upcoming {
        /// Days ahead to include
        #[arg(long, default_value = "7")]
        days: u32,
        /// Only tasks of this project
        #[arg(long)]
        project: Option<i64>,
    },
}

pub fn run(action: CalendarAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        CalendarAction::Grid {
            month,
            week_start,
            json,
        } => {
            let week_start = week_start.unwrap_or(config.calendar.week_start);
            let grid = CalendarGrid::for_month(month.unwrap_or_else(today), week_start.weekday());
            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                print!("{}", render_grid(&grid));
            }
        }
        CalendarAction::Show {
            month,
            offset,
            project,
        } => {
            let mut navigator =
                MonthNavigator::new(month.unwrap_or_else(today), config.calendar.week_start.weekday())
                    .for_view(View::Calendar);
            let mut events: Vec<Event> = Vec::new();
            for _ in 0..offset.unsigned_abs() {
                if offset > 0 {
                    navigator.next(&mut events);
                } else {
                    navigator.previous(&mut events);
                }
            }
            for event in &events {
                log::debug!("{}", serde_json::to_string(event)?);
            }

            let db = TaskDb::open()?;
            let projects: HashMap<i64, Project> = db
                .list_projects()?
                .into_iter()
                .map(|p| (p.id, p))
                .collect();
            let tasks = db.list_tasks(&TaskFilter {
                project_id: project,
                status: None,
            })?;
            let grid = navigator.grid();
            let entries = filter_in_range(&tasks, &grid.span())
                .into_iter()
                .filter_map(|task| {
                    let project = projects.get(&task.project_id)?;
                    CalendarEvent::from_task(task, project)
                });
            let buckets = bucket_by_day(entries, grid);

            println!("{}", navigator.title());
            if buckets.is_empty() {
                println!("(no entries)");
            }
            for date in buckets.dates() {
                let cell = buckets.cell(date, config.calendar.max_visible_entries);
                let marker = if grid.is_in_month(date) { "" } else { " (adjacent month)" };
                println!("{}{marker}", date.format("%a %Y-%m-%d"));
                for entry in cell.visible {
                    println!("  [{}] {} ({})", entry.status, entry.title, entry.project_name);
                }
                if let Some(label) = cell.overflow_label() {
                    println!("  {label}");
                }
            }
        }
        CalendarAction::Upcoming { days, project } => {
            let db = TaskDb::open()?;
            let tasks = db.list_tasks(&TaskFilter {
                project_id: project,
                status: None,
            })?;
            let deadlines = upcoming_deadlines(&tasks, today(), days);
            println!("{}", serde_json::to_string_pretty(&deadlines)?);
        }
    }
    Ok(())
}

fn render_grid(grid: &CalendarGrid) -> String {
    let mut out = format!("{}\n", grid.month().start().format("%B %Y"));
    let header: Vec<String> = grid
        .weeks()
        .next()
        .unwrap_or_default()
        .iter()
        .map(|d| format!("{:>5}", &d.format("%a").to_string()[..2]))
        .collect();
    out.push_str(&header.concat());
    out.push('\n');

    for week in grid.weeks() {
        for &day in week {
            let label = day.format("%-d").to_string();
            if grid.is_in_month(day) {
                out.push_str(&format!("{label:>5}"));
            } else {
                out.push_str(&format!("{:>5}", format!("({label})")));
            }
        }
        out.push('\n');
    }
    out
}
