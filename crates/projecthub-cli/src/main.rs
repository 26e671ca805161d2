use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

mod commands;

#[derive(Parser)]
#[command(name = "projecthub", version, about = "ProjectHub CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gantt timeline layout
    Gantt {
        #[command(subcommand)]
        action: commands::gantt::GanttAction,
    },
    /// Month calendar
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Kanban board
    Kanban {
        #[command(subcommand)]
        action: commands::kanban::KanbanAction,
    },
    /// Task reminders
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Task counts and completion rate
    Dashboard {
        /// Only tasks of this project
        #[arg(long)]
        project: Option<i64>,
    },
    /// Project management
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Persisted UI state
    State {
        #[command(subcommand)]
        action: commands::state::StateAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Gantt { action } => commands::gantt::run(action),
        Commands::Calendar { action } => commands::calendar::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Kanban { action } => commands::kanban::run(action),
        Commands::Reminder { action } => commands::reminder::run(action),
        Commands::Dashboard { project } => commands::dashboard::run(project),
        Commands::Project { action } => commands::project::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::State { action } => commands::state::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "projecthub", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
