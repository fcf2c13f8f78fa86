use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "br", about = concat!("[~] braid v", env!("CARGO_PKG_VERSION"), " - three levels, one list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List threads, all levels or one
    List(ListArgs),
    /// Add a thread, or a step under an existing item
    Add(AddArgs),
    /// Delete an item by title (subtree included)
    Delete(TitleArgs),
    /// Rename an item
    Rename(RenameArgs),
    /// Toggle completion on an item (repeat-aware)
    Done(TitleArgs),
    /// Set a target date from a phrase like "by thursday 6pm"
    Target(TargetArgs),
    /// Promote a nested item to a top-level thread
    Promote(TitleArgs),
    /// Move an item within its siblings
    Mv(MvArgs),
    /// Toggle an item's fold in `list --folded` output
    Fold(TitleArgs),
    /// Run free-form text through the edit pipeline
    Ai(AiArgs),
    /// Append or list life-log entries
    Log(LogCmd),
}

#[derive(Args)]
pub struct ListArgs {
    /// Level to list (baseline, execution, creative; default: all)
    pub level: Option<String>,
    /// Respect the saved fold state (threads start collapsed)
    #[arg(long)]
    pub folded: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Item text; a trailing "by <when>" sets the target date
    #[arg(required = true)]
    pub text: Vec<String>,
    /// Level to add to (default: from config)
    #[arg(long)]
    pub level: Option<String>,
    /// Title of the parent item to nest under
    #[arg(long)]
    pub under: Option<String>,
}

#[derive(Args)]
pub struct TitleArgs {
    /// Item title (matched trimmed, case-insensitive)
    #[arg(required = true)]
    pub title: Vec<String>,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Current title
    pub old: String,
    /// New title
    pub new: String,
}

#[derive(Args)]
pub struct TargetArgs {
    /// Item title
    pub title: String,
    /// Date phrase ("by thursday", "by 6pm tomorrow")
    pub when: Vec<String>,
    /// Clear the target date instead
    #[arg(long, conflicts_with = "when")]
    pub clear: bool,
}

#[derive(Args)]
pub struct MvArgs {
    /// Item title
    pub title: String,
    /// up, down, top, or bottom
    pub direction: String,
}

#[derive(Args)]
pub struct AiArgs {
    /// Instruction text
    #[arg(required = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct LogCmd {
    #[command(subcommand)]
    pub command: LogCommands,
}

#[derive(Subcommand)]
pub enum LogCommands {
    /// Append a log entry
    Add(LogAddArgs),
    /// List log entries, newest first
    List,
}

#[derive(Args)]
pub struct LogAddArgs {
    /// Entry kind (food, supplement, gym, sleep, walk, mood, dream, insight, event)
    pub kind: String,
    /// Entry text
    #[arg(required = true)]
    pub text: Vec<String>,
}
