//! Per-project record store boundary
//!
//! The merge cache only needs `get`/`save` per project and bucket; it builds
//! `merge` on top. Two implementations ship:
//!
//! - [`SqliteStore`] - durable, one SQLite file per workspace
//! - [`MemoryStore`] - process-local, for tests and embedding
//!
//! Stores never retry. A failed `get` or `save` surfaces as [`StoreError`]
//! and the caller must assume nothing was written.

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

use crate::core::identity::{EntityKind, ProjectId, TaxonomyKind};
use crate::entities::{Favorites, RecentsList, TaxonomyMap};

/// Storage capability the core depends on
pub trait RecordStore {
    /// Stored records of one kind, in stored order; empty if none yet
    fn get_records(&self, project: &ProjectId, kind: EntityKind) -> Result<Vec<Value>, StoreError>;

    /// Replace all records of one kind
    fn save_records(
        &self,
        project: &ProjectId,
        kind: EntityKind,
        records: &[Value],
    ) -> Result<(), StoreError>;

    fn get_taxonomy(&self, project: &ProjectId, kind: TaxonomyKind) -> Result<TaxonomyMap, StoreError>;

    /// Replace a taxonomy table
    fn save_taxonomy(
        &self,
        project: &ProjectId,
        kind: TaxonomyKind,
        map: &TaxonomyMap,
    ) -> Result<(), StoreError>;

    fn get_favorites(&self, project: &ProjectId) -> Result<Favorites, StoreError>;

    fn save_favorites(&self, project: &ProjectId, favorites: &Favorites) -> Result<(), StoreError>;

    fn get_recents(&self, project: &ProjectId) -> Result<RecentsList, StoreError>;

    fn save_recents(&self, project: &ProjectId, recents: &RecentsList) -> Result<(), StoreError>;

    /// Every project with stored data, sorted
    fn projects(&self) -> Result<Vec<ProjectId>, StoreError>;

    /// Remove everything stored for a project
    fn clear_project(&self, project: &ProjectId) -> Result<(), StoreError>;
}

/// Errors raised at the storage boundary
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("database error: {0}")]
    #[diagnostic(code(plancache::store::sqlite))]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored data could not be encoded or decoded: {0}")]
    #[diagnostic(
        code(plancache::store::json),
        help("the cache may be from an incompatible version; run `plancache cache clear`")
    )]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    #[diagnostic(code(plancache::store::io))]
    Io(#[from] std::io::Error),

    #[error("only read-only statements may be run against the cache")]
    #[diagnostic(code(plancache::store::not_read_only))]
    NotReadOnly,

    #[error("store lock poisoned by a panicking writer")]
    #[diagnostic(code(plancache::store::poisoned))]
    Poisoned,
}
