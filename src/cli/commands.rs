use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gd", about = concat!("[>] getdone v", env!("CARGO_PKG_VERSION"), " - tasks, projects, reminders"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to the active view (project view files it to that project)
    Add(AddArgs),
    /// List tasks in the active view
    List(ListArgs),
    /// Switch the active view
    View(ViewArgs),
    /// Toggle a task's completed flag
    Toggle(IdArg),
    /// Mark a task done (shortcut for toggling an open task)
    Done(IdArg),
    /// Delete a task
    Rm(IdArg),
    /// Project management
    Project(ProjectCmd),
    /// List projects with open-task counts
    Projects,
    /// Arm reminders for due tasks and keep the process alive to fire them
    Watch,
}

// ---------------------------------------------------------------------------
// Task command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Due instant (RFC 3339, e.g. 2026-09-01T09:00:00Z)
    #[arg(long)]
    pub due: Option<String>,
    /// Reminder lead time in minutes before the due instant
    #[arg(long, value_name = "MINUTES")]
    pub remind: Option<u32>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive substring filter on task text
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct ViewArgs {
    /// View to switch to (inbox, today, completed, project)
    pub view: String,
    /// Project id (required for the project view)
    pub project: Option<i64>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: i64,
}

// ---------------------------------------------------------------------------
// Project management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectCmd {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    New(ProjectNewArgs),
    /// Delete a project (its tasks move to the inbox)
    Rm(ProjectIdArg),
}

#[derive(Args)]
pub struct ProjectNewArgs {
    /// Project name
    pub name: String,
}

#[derive(Args)]
pub struct ProjectIdArg {
    /// Project ID
    pub id: i64,
}
