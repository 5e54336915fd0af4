//! Shared helper functions for CLI commands
//!
//! Workspace, config, and cache resolution used by every command that reads
//! or writes the cache.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, MergeCache, ProjectId, SqliteStore, Workspace};

/// Find the workspace from `--workspace` or by walking up from the current directory
pub fn discover_workspace(global: &GlobalOpts) -> Result<Workspace> {
    let workspace = match &global.workspace {
        Some(root) => Workspace::open(root)?,
        None => Workspace::discover()?,
    };
    Ok(workspace)
}

/// Open the workspace's cache database
pub fn open_cache(workspace: &Workspace) -> Result<MergeCache<SqliteStore>> {
    let store = SqliteStore::open(&workspace.cache_path())?;
    Ok(MergeCache::new(store))
}

/// Everything a cache command needs, resolved once
pub struct Session {
    pub workspace: Workspace,
    pub config: Config,
    pub cache: MergeCache<SqliteStore>,
}

impl Session {
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let workspace = discover_workspace(global)?;
        let config = Config::load(Some(&workspace));
        let cache = open_cache(&workspace)?;
        Ok(Self {
            workspace,
            config,
            cache,
        })
    }

    /// Project from `--project-id`, falling back to configuration
    pub fn project(&self, global: &GlobalOpts) -> Result<ProjectId> {
        resolve_project(global, &self.config)
    }

    pub fn format(&self, global: &GlobalOpts) -> OutputFormat {
        resolve_format(global, &self.config)
    }
}

pub fn resolve_project(global: &GlobalOpts, config: &Config) -> Result<ProjectId> {
    let raw = global
        .project_id
        .as_deref()
        .or(config.default_project.as_deref())
        .ok_or_else(|| {
            miette::miette!(
                help = "pass --project-id, set PLANCACHE_PROJECT, or set default_project in config",
                "no project selected"
            )
        })?;
    raw.parse::<ProjectId>().map_err(|e| miette::miette!("{}", e))
}

/// Explicit `--format` wins, then `default_format` from config
pub fn resolve_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|f| f.parse().ok())
        .unwrap_or(OutputFormat::Auto)
}

/// Print `value` as JSON or YAML when `format` asks for it
///
/// Returns false for table formats so the caller renders a table instead.
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(value).into_diagnostic()?);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Current time in milliseconds since the epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
