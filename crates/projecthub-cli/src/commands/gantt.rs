//! Gantt commands: single-span layout and a terminal chart.

use std::collections::HashMap;

use chrono::NaiveDate;
use clap::Subcommand;
use projecthub_core::storage::{Config, TaskDb, TaskFilter};
use projecthub_core::timeline::{
    compute_span_with, today_marker, DateSpan, DateWindow, GanttChart, GanttRow, InvertedRangePolicy,
    TimelineLayout,
};

use super::{parse_month, today};

#[derive(Subcommand)]
pub enum GanttAction {
    /// Compute the visible span of one date range
    Span {
        /// Item start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Item end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// First day of the window
        #[arg(long)]
        window_start: NaiveDate,
        /// Last day of the window
        #[arg(long)]
        window_end: NaiveDate,
        /// Slots in the track (default: days in the window)
        #[arg(long)]
        window_length: Option<u32>,
        /// Inverted range handling (collapse_to_start, swap, hide)
        #[arg(long, value_parser = parse_policy)]
        inverted: Option<InvertedRangePolicy>,
    },
    /// Draw the chart for one month
    Chart {
        /// Month to show (YYYY-MM, default: current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,
        /// Only tasks of this project
        #[arg(long)]
        project: Option<i64>,
        /// Print the laid-out rows as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_policy(value: &str) -> Result<InvertedRangePolicy, String> {
    [
        InvertedRangePolicy::CollapseToStart,
        InvertedRangePolicy::Swap,
        InvertedRangePolicy::Hide,
    ]
    .into_iter()
    .find(|p| p.as_str() == value)
    .ok_or_else(|| format!("unknown policy '{value}'"))
}

pub fn run(action: GanttAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        GanttAction::Span {
            start,
            end,
            window_start,
            window_end,
            window_length,
            inverted,
        } => {
            let window = DateWindow::new(window_start, window_end)?;
            let length = window_length.unwrap_or_else(|| window.len_days());
            let policy = inverted.unwrap_or(config.gantt.inverted_range);
            let span = compute_span_with(&DateSpan::open(start, end), &window, length, policy);
            println!("{}", serde_json::to_string_pretty(&span)?);
        }
        GanttAction::Chart {
            month,
            project,
            json,
        } => {
            let db = TaskDb::open()?;
            let tasks = db.list_tasks(&TaskFilter {
                project_id: project,
                status: None,
            })?;
            let colors: HashMap<i64, String> = db
                .list_projects()?
                .into_iter()
                .map(|p| (p.id, p.color))
                .collect();

            let window = DateWindow::month_of(month.unwrap_or_else(today));
            let layout = TimelineLayout::for_window(window).with_policy(config.gantt.inverted_range);
            let chart = GanttChart::layout_with(&tasks, layout, |project| {
                colors.get(&project).map(String::as_str)
            });

            if json {
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                print!("{}", render(&chart, config.gantt.bar_width as usize, today()));
            }
        }
    }
    Ok(())
}

const TITLE_WIDTH: usize = 24;

fn render(chart: &GanttChart, track: usize, today: NaiveDate) -> String {
    let window = chart.layout.window;
    let mut out = format!(
        "{:<TITLE_WIDTH$} {} .. {}\n",
        window.start().format("%B %Y").to_string(),
        window.start(),
        window.end()
    );

    if let Some(marker) = today_marker(&window, today) {
        let col = ((marker * track as f64) as usize).min(track.saturating_sub(1));
        out.push_str(&format!("{:<TITLE_WIDTH$} {}v\n", "", " ".repeat(col)));
    }

    if chart.rows.is_empty() {
        out.push_str("(no tasks)\n");
    }
    for row in &chart.rows {
        out.push_str(&format!(
            "{:<TITLE_WIDTH$.TITLE_WIDTH$} {}\n",
            row.title,
            bar(row, track)
        ));
    }
    out
}

fn bar(row: &GanttRow, track: usize) -> String {
    let track = track.max(1);
    let Some(span) = row.span else {
        return String::from("-");
    };
    let (left, width) = span.scaled(track as f64);
    let left = (left.round() as usize).min(track - 1);
    let width = (width.round() as usize).clamp(1, track - left);
    format!(
        "{}{} {:.0}%",
        " ".repeat(left),
        "#".repeat(width),
        row.progress
    )
}
