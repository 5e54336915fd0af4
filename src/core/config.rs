//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::Workspace;

/// Plancache configuration with layered hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Project id used when a command omits `--project-id`
    pub default_project: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Tracing filter directive
    pub log_level: Option<String>,
}

/// A config file that exists but could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub path: PathBuf,
    pub message: String,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// Unreadable files are skipped silently; use [`Config::load_checked`]
    /// to find out about them.
    pub fn load(workspace: Option<&Workspace>) -> Self {
        Self::load_checked(workspace).0
    }

    /// Like [`Config::load`], also returning every file that was skipped
    pub fn load_checked(workspace: Option<&Workspace>) -> (Self, Vec<ConfigIssue>) {
        let mut config = Config::default();
        let mut issues = Vec::new();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/plancache/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            match Self::read(&global_path) {
                Ok(Some(global)) => config.merge(global),
                Ok(None) => {}
                Err(issue) => issues.push(issue),
            }
        }

        // 3. Workspace config (.plancache/config.yaml)
        if let Some(ws) = workspace {
            match Self::read(&ws.config_path()) {
                Ok(Some(local)) => config.merge(local),
                Ok(None) => {}
                Err(issue) => issues.push(issue),
            }
        }

        // 4. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        (config, issues)
    }

    fn read(path: &Path) -> Result<Option<Config>, ConfigIssue> {
        if !path.exists() {
            return Ok(None);
        }
        let issue = |message: String| ConfigIssue {
            path: path.to_path_buf(),
            message,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| issue(e.to_string()))?;
        serde_yml::from_str::<Config>(&contents)
            .map(Some)
            .map_err(|e| issue(e.to_string()))
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "plancache")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_project.is_some() {
            self.default_project = other.default_project;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(project) = var("PLANCACHE_PROJECT").filter(|v| !v.trim().is_empty()) {
            self.default_project = Some(project);
        }
        if let Some(level) = var("PLANCACHE_LOG").filter(|v| !v.trim().is_empty()) {
            self.log_level = Some(level);
        }
    }
}
