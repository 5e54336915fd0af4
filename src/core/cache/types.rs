//! Result types returned by the merge cache

use serde::Serialize;

use crate::core::identity::{EntityKind, ProjectId};

/// Outcome of one merge call
#[derive(Debug, Clone, PartialEq)]
pub struct Merged<R> {
    /// The full stored list after the merge
    pub records: Vec<R>,
    /// How many incoming records were accepted
    pub added: usize,
}

impl<R> Merged<R> {
    pub fn total(&self) -> usize {
        self.records.len()
    }
}

/// Record counts for one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindCount {
    pub kind: EntityKind,
    pub count: usize,
}

/// Summary of everything stored for a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatistics {
    pub project: ProjectId,
    pub records: Vec<KindCount>,
    pub disciplines: usize,
    pub divisions: usize,
    pub favorite_folders: usize,
    pub favorite_drawings: usize,
    pub recents: usize,
}

impl CacheStatistics {
    pub fn total_records(&self) -> usize {
        self.records.iter().map(|c| c.count).sum()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.records
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}
