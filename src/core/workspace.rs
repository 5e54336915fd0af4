//! Workspace discovery and layout

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Name of the workspace data directory
pub const DATA_DIR: &str = ".plancache";

/// Cache database file inside the data directory
const CACHE_FILE: &str = "cache.db";

/// A directory holding a `.plancache/` data directory
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Root directory of the workspace (parent of .plancache/)
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current =
            std::env::current_dir().map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        loop {
            if current.join(DATA_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Open an explicitly given workspace root without walking up
    pub fn open(root: &Path) -> Result<Self, WorkspaceError> {
        let root = root
            .canonicalize()
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        if !root.join(DATA_DIR).is_dir() {
            return Err(WorkspaceError::NotFound {
                searched_from: root,
            });
        }
        Ok(Self { root })
    }

    /// Create a new workspace at the given path
    pub fn init(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if root.join(DATA_DIR).exists() {
            return Err(WorkspaceError::AlreadyExists(root));
        }
        Self::create(root)
    }

    /// Initialize even if .plancache/ exists, rewriting the default config
    ///
    /// The cache database is left alone.
    pub fn init_force(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create(root)
    }

    fn create(root: PathBuf) -> Result<Self, WorkspaceError> {
        let data_dir = root.join(DATA_DIR);
        std::fs::create_dir_all(&data_dir).map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        std::fs::write(data_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Plancache workspace configuration

# Project id used when a command omits --project-id
# default_project: ""

# Default output format (auto, tsv, json, csv, md, yaml)
# default_format: auto

# Log filter, e.g. "plancache=debug"
# log_level: warn
"#
    }

    /// Get the workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .plancache data directory
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir().join("config.yaml")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir().join(CACHE_FILE)
    }
}

/// Errors that can occur while locating or creating a workspace
#[derive(Debug, Error, Diagnostic)]
pub enum WorkspaceError {
    #[error("not a plancache workspace (searched from {searched_from:?})")]
    #[diagnostic(
        code(plancache::workspace::not_found),
        help("run `plancache init` to create one")
    )]
    NotFound { searched_from: PathBuf },

    #[error("plancache workspace already exists at {0:?}")]
    #[diagnostic(
        code(plancache::workspace::exists),
        help("use `plancache init --force` to rewrite the default config")
    )]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    #[diagnostic(code(plancache::workspace::io))]
    IoError(String),
}
