//! Core module - fundamental types and the storage boundary

pub mod cache;
pub mod config;
pub mod entity;
pub mod identity;
pub mod store;
pub mod workspace;

pub use cache::{CacheStatistics, MergeCache, Merged};
pub use config::{Config, ConfigIssue};
pub use entity::Record;
pub use identity::{EntityKind, KindParseError, ProjectId, TaxonomyKind};
pub use store::{MemoryStore, RecordStore, SqliteStore, StoreError};
pub use workspace::{Workspace, WorkspaceError};
