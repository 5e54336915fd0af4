//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    cache::CacheCommands, capture::CaptureArgs, completions::CompletionsArgs,
    config::ConfigCommands, fav::FavCommands, init::InitArgs, list::ListArgs,
    recent::RecentCommands, search::SearchArgs,
};

#[derive(Parser)]
#[command(name = "plancache")]
#[command(author, version, about = "Capture, classify and search project-management records")]
#[command(long_about = "Feeds captured API responses through a classifier into a per-project \
merge cache, then searches drawings and RFIs with fuzzy matching and discipline grouping.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace root (default: auto-detect by finding .plancache/)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Project id (default: `default_project` from config)
    #[arg(long = "project-id", short = 'p', global = true)]
    pub project_id: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new plancache workspace
    Init(InitArgs),

    /// Ingest captured API responses into the cache
    Capture(CaptureArgs),

    /// List cached records or taxonomy tables
    List(ListArgs),

    /// Search drawings and RFIs (`?` RFIs, `*` favorites, `@` discipline)
    Search(SearchArgs),

    /// Manage favorite folders
    #[command(subcommand)]
    Fav(FavCommands),

    /// Recently opened drawings
    #[command(subcommand)]
    Recent(RecentCommands),

    /// Inspect and maintain the cache database
    #[command(subcommand)]
    Cache(CacheCommands),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (tsv for lists)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}
