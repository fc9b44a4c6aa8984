use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "th", about = concat!("[#] taskhive v", env!("CARGO_PKG_VERSION"), " - your to-dos in tabs"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the taskhive data directory with a default config
    Init(InitArgs),
    /// List tabs with task counts and progress
    Tabs,
    /// Tab management
    Tab(TabCmd),
    /// List tasks in a tab (default: the active tab)
    List(ListArgs),
    /// Add a task
    Add(AddArgs),
    /// Mark a task completed
    Done(TaskRefArgs),
    /// Mark a task not completed
    Undo(TaskRefArgs),
    /// Remove a task
    Rm(RmArgs),
    /// Import tasks from a delimited text file
    Import(ImportArgs),
    /// Show a tab's task count and progress
    Progress(ProgressArgs),
    /// Show or edit configuration
    Config(ConfigCmd),
    /// Show login status (remote backend)
    Status,
    /// Log in to the remote backend
    Login(LoginArgs),
    /// Log out of the remote backend
    Logout,
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Tab to list (default: the active tab)
    pub tab: Option<String>,
}

#[derive(Args)]
pub struct ProgressArgs {
    /// Tab to report on (default: the active tab)
    pub tab: Option<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Target tab (default: the active tab)
    #[arg(long)]
    pub tab: Option<String>,
    /// Longer description
    #[arg(long)]
    pub desc: Option<String>,
}

#[derive(Args)]
pub struct TaskRefArgs {
    /// Task ID
    pub id: String,
    /// Owning tab (default: the active tab)
    #[arg(long)]
    pub tab: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task ID
    pub id: String,
    /// Owning tab (default: the active tab)
    #[arg(long)]
    pub tab: Option<String>,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Text file to import (one task per line, `name | description`)
    pub file: String,
    /// Target tab (default: the active tab)
    #[arg(long)]
    pub tab: Option<String>,
    /// Mark every imported task as already completed
    #[arg(long)]
    pub completed: bool,
}

// ---------------------------------------------------------------------------
// Tab management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TabCmd {
    #[command(subcommand)]
    pub action: TabAction,
}

#[derive(Subcommand)]
pub enum TabAction {
    /// Create a new tab
    New(TabNewArgs),
    /// Delete a tab and all of its tasks
    Delete(TabDeleteArgs),
    /// Switch the active tab
    Use(TabIdArg),
}

#[derive(Args)]
pub struct TabNewArgs {
    /// Tab display name (the id is derived from it)
    pub name: String,
    /// Switch to the new tab immediately
    #[arg(long = "use")]
    pub use_tab: bool,
}

#[derive(Args)]
pub struct TabDeleteArgs {
    /// Tab ID
    pub id: String,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct TabIdArg {
    /// Tab ID
    pub id: String,
}

// ---------------------------------------------------------------------------
// Config and auth
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration (default)
    Show,
    /// Set the persistence backend (local or remote)
    Backend(BackendArgs),
    /// Set the remote server base URL
    Url(UrlArgs),
}

#[derive(Args)]
pub struct BackendArgs {
    /// "local" or "remote"
    pub backend: String,
}

#[derive(Args)]
pub struct UrlArgs {
    /// Base URL, e.g. http://localhost:5000
    pub url: String,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,
    /// Account password
    #[arg(long)]
    pub password: String,
}
