//! Persisted UI state: selected project, sidebar, current view.

use clap::Subcommand;
use projecthub_core::state::{AppState, FileStateStore, StateStore};
use projecthub_core::storage::TaskDb;
use projecthub_core::View;

#[derive(Subcommand)]
pub enum StateAction {
    /// Print the persisted state
    Show,
    /// Select the current project
    SelectProject {
        /// Project ID
        id: i64,
    },
    /// Open or close the sidebar
    ToggleSidebar,
    /// Switch the current view
    View {
        /// dashboard, kanban, gantt, calendar or list
        view: View,
    },
    /// Forget the persisted state
    Clear,
}

pub fn run(action: StateAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileStateStore::open()?;
    let mut state = store.load()?.map(AppState::restore).unwrap_or_default();

    match action {
        StateAction::Show => {
            println!("{}", serde_json::to_string_pretty(&state.persisted())?);
            return Ok(());
        }
        StateAction::SelectProject { id } => {
            let db = TaskDb::open()?;
            state.set_projects(db.list_projects()?);
            let project = state.select_project_id(id)?;
            println!("Current project: {} ({})", project.name, project.id);
        }
        StateAction::ToggleSidebar => {
            let open = state.toggle_sidebar();
            println!("sidebar {}", if open { "open" } else { "closed" });
        }
        StateAction::View { view } => {
            state.set_view(view);
            println!("view: {view}");
        }
        StateAction::Clear => {
            store.clear()?;
            println!("state cleared");
            return Ok(());
        }
    }

    store.save(&state.persisted())?;
    Ok(())
}
