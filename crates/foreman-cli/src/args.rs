use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Main command-line interface for the Foreman plan executor
///
/// Foreman turns free-form plan text (agent output, markdown notes, a
/// numbered list) into structured plans and executes them step by step
/// against a workspace. Plans move through an explicit lifecycle:
/// draft, approved, executing, and a terminal state.
#[derive(Parser)]
#[command(version, about, name = "fm")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/foreman/foreman.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Workspace directory that command steps run in. Required for
    /// execution; defaults to the current directory.
    #[arg(long, global = true)]
    pub workspace_root: Option<PathBuf>,

    /// Shell command that file and research steps are piped to as
    /// natural-language instructions. Without it those steps fail.
    #[arg(long, global = true)]
    pub agent_cmd: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Foreman CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Parse plan text from a file (or stdin) into a draft plan
    #[command(alias = "p")]
    Parse(ParseArgs),
    /// Create an empty draft plan
    #[command(alias = "n")]
    New(NewPlanArgs),
    /// List all plans
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show the full markdown report for a plan
    #[command(alias = "s")]
    Show(PlanIdArgs),
    /// Approve a draft plan for execution
    #[command(alias = "a")]
    Approve(PlanIdArgs),
    /// Execute a plan step by step
    #[command(alias = "x")]
    Execute(ExecuteArgs),
    /// Mark a pending step as skipped
    Skip(SkipStepArgs),
    /// Delete a plan permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeletePlanArgs),
    /// Export a plan as markdown
    #[command(alias = "e")]
    Export(ExportArgs),
    /// Show or set the active plan
    Active(ActivePlanArgs),
}

/// Parse plan text into a draft plan
#[derive(ClapArgs)]
pub struct ParseArgs {
    /// File containing the plan text; reads stdin when omitted or "-"
    pub file: Option<PathBuf>,
}

/// Create an empty draft plan
#[derive(ClapArgs)]
pub struct NewPlanArgs {
    /// Title of the plan
    pub title: String,
    /// Optional description providing more context about the plan
    #[arg(short, long)]
    pub description: Option<String>,
    /// Optional goal describing what the plan should achieve
    #[arg(short, long)]
    pub goal: Option<String>,
}

/// List plans, optionally filtered by lifecycle state
#[derive(ClapArgs)]
pub struct ListPlansArgs {
    /// Only show plans in this state (draft, approved, executing,
    /// completed, failed, cancelled)
    #[arg(long)]
    pub status: Option<String>,
}

/// Operations addressing a single plan by id
#[derive(ClapArgs)]
pub struct PlanIdArgs {
    /// Unique identifier of the plan
    pub id: u64,
}

/// Execute a plan step by step
#[derive(ClapArgs)]
pub struct ExecuteArgs {
    /// Unique identifier of the plan to execute
    pub id: u64,
    /// Simulate the run without performing any step's work
    #[arg(long)]
    pub dry_run: bool,
    /// Run every step without asking for per-step approval
    #[arg(short = 'y', long)]
    pub auto_approve: bool,
    /// Stop at the first failed step instead of continuing
    #[arg(long)]
    pub stop_on_error: bool,
}

/// Mark a pending step as skipped
#[derive(ClapArgs)]
pub struct SkipStepArgs {
    /// Unique identifier of the plan
    pub id: u64,
    /// Dotted step identifier within the plan (e.g. 2 or 2.1)
    pub step_id: String,
}

/// Delete a plan permanently
#[derive(ClapArgs)]
pub struct DeletePlanArgs {
    /// Unique identifier of the plan to permanently delete
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

/// Export a plan as markdown
#[derive(ClapArgs)]
pub struct ExportArgs {
    /// Unique identifier of the plan to export
    pub id: u64,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Show or set the active plan
#[derive(ClapArgs)]
pub struct ActivePlanArgs {
    /// Plan to mark active; shows the current one when omitted
    pub id: Option<u64>,
    /// Clear the active-plan pointer
    #[arg(long, conflicts_with = "id")]
    pub clear: bool,
}
