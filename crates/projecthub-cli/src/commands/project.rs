use clap::Subcommand;
use projecthub_core::model::ProjectPatch;
use projecthub_core::state::{AppState, FileStateStore, StateStore};
use projecthub_core::storage::TaskDb;

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// Project description
        #[arg(long)]
        description: Option<String>,
        /// Project color, e.g. "#6366F1"
        #[arg(long)]
        color: Option<String>,
    },
    /// List projects with task counts
    List,
    /// Update a project
    Update {
        /// Project ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New color
        #[arg(long)]
        color: Option<String>,
        /// Archive the project
        #[arg(long, conflicts_with = "unarchive")]
        archive: bool,
        /// Restore an archived project
        #[arg(long)]
        unarchive: bool,
    },
    /// Delete a project and all of its tasks
    Delete {
        /// Project ID
        id: i64,
    },
}

pub fn run(action: ProjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = TaskDb::open()?;

    match action {
        ProjectAction::Create {
            name,
            description,
            color,
        } => {
            let project = db.create_project(&name, description.as_deref(), color.as_deref())?;
            println!("Project created: {}", project.id);
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectAction::List => {
            let projects = db.list_projects()?;
            println!("{}", serde_json::to_string_pretty(&projects)?);
        }
        ProjectAction::Update {
            id,
            name,
            description,
            color,
            archive,
            unarchive,
        } => {
            let patch = ProjectPatch {
                name,
                description,
                color,
                is_archived: match (archive, unarchive) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };
            if patch == ProjectPatch::default() {
                return Err("nothing to update".into());
            }
            let project = db.update_project(id, &patch)?;
            sync_state(|state| state.update_project(id, &patch))?;
            println!("Project updated: {id}");
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectAction::Delete { id } => {
            db.delete_project(id)?;
            sync_state(|state| state.remove_project(id))?;
            println!("Project deleted: {id}");
        }
    }
    Ok(())
}

/// Apply `change` to the persisted UI state, if there is one.
fn sync_state(change: impl FnOnce(&mut AppState)) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileStateStore::open()?;
    if let Some(persisted) = store.load()? {
        let mut state = AppState::restore(persisted);
        change(&mut state);
        store.save(&state.persisted())?;
    }
    Ok(())
}
