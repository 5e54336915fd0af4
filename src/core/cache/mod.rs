//! Per-project merge cache
//!
//! Captured pages arrive in any order and often overlap. The cache appends
//! only records whose id it has not seen, so replaying a capture is a no-op
//! and the stored list only ever grows (until the project is cleared).
//!
//! Every operation is a read-then-write against the injected [`RecordStore`].
//! Two merges racing on the same project and kind can lose one side's new
//! records; the next capture of the same page restores them.

mod types;

pub use types::*;

use std::collections::HashSet;

use serde_json::Value;

use crate::core::entity::Record;
use crate::core::identity::{EntityKind, ProjectId, TaxonomyKind};
use crate::core::store::{RecordStore, StoreError};
use crate::entities::{Drawing, Favorites, RecentsList, Rfi, TaxonomyMap};
use crate::search::{self, SearchContext, SearchResults};

/// Merge cache over a record store
pub struct MergeCache<S> {
    store: S,
}

impl<S: RecordStore> MergeCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored records of one kind, in stored order
    pub fn get<R: Record>(&self, project: &ProjectId) -> Result<Vec<R>, StoreError> {
        self.store
            .get_records(project, R::KIND)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(StoreError::from))
            .collect()
    }

    /// Replace the stored list of one kind
    pub fn save<R: Record>(&self, project: &ProjectId, records: &[R]) -> Result<(), StoreError> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()?;
        self.store.save_records(project, R::KIND, &values)
    }

    /// Append records whose id is not stored yet and return the merged list
    ///
    /// Existing records keep their order and fields; accepted records follow
    /// in arrival order. Merging the same batch twice changes nothing.
    pub fn merge<R: Record>(&self, project: &ProjectId, incoming: &[R]) -> Result<Vec<R>, StoreError> {
        self.merge_counted(project, incoming).map(|m| m.records)
    }

    /// Like [`merge`](Self::merge), also reporting how many records were added
    pub fn merge_counted<R: Record>(
        &self,
        project: &ProjectId,
        incoming: &[R],
    ) -> Result<Merged<R>, StoreError> {
        let mut records: Vec<R> = self.get(project)?;
        let mut seen: HashSet<i64> = records.iter().map(Record::id).collect();

        let before = records.len();
        // `insert` also drops repeats inside the batch itself
        records.extend(incoming.iter().filter(|r| seen.insert(r.id())).cloned());
        let added = records.len() - before;

        if added > 0 {
            self.save(project, &records)?;
        }

        tracing::info!(
            project = %project,
            kind = %R::KIND,
            added,
            total = records.len(),
            "merged records"
        );

        Ok(Merged { records, added })
    }

    pub fn get_taxonomy(&self, project: &ProjectId, kind: TaxonomyKind) -> Result<TaxonomyMap, StoreError> {
        self.store.get_taxonomy(project, kind)
    }

    /// Key-union `incoming` into the stored map; incoming entries win
    pub fn merge_taxonomy(
        &self,
        project: &ProjectId,
        kind: TaxonomyKind,
        incoming: TaxonomyMap,
    ) -> Result<TaxonomyMap, StoreError> {
        let mut map = self.store.get_taxonomy(project, kind)?;
        let seen = incoming.len();
        map.merge(incoming);
        self.store.save_taxonomy(project, kind, &map)?;

        tracing::info!(project = %project, kind = %kind, seen, total = map.len(), "merged taxonomy");
        Ok(map)
    }

    /// Replace a taxonomy map outright, as after a full rescan
    pub fn replace_taxonomy(
        &self,
        project: &ProjectId,
        kind: TaxonomyKind,
        map: &TaxonomyMap,
    ) -> Result<(), StoreError> {
        self.store.save_taxonomy(project, kind, map)
    }

    pub fn favorites(&self, project: &ProjectId) -> Result<Favorites, StoreError> {
        self.store.get_favorites(project)
    }

    pub fn save_favorites(&self, project: &ProjectId, favorites: &Favorites) -> Result<(), StoreError> {
        self.store.save_favorites(project, favorites)
    }

    pub fn recents(&self, project: &ProjectId) -> Result<RecentsList, StoreError> {
        self.store.get_recents(project)
    }

    /// Move a drawing number to the front of the recents list
    pub fn touch_recent(&self, project: &ProjectId, num: &str) -> Result<RecentsList, StoreError> {
        let mut recents = self.store.get_recents(project)?;
        recents.touch(num);
        self.store.save_recents(project, &recents)?;
        Ok(recents)
    }

    /// Search the stored snapshot for a project
    ///
    /// The reads are independent; a concurrent merge may land between them.
    pub fn search(&self, project: &ProjectId, query: &str) -> Result<SearchResults, StoreError> {
        let drawings: Vec<Drawing> = self.get(project)?;
        let rfis: Vec<Rfi> = self.get(project)?;
        let disciplines = self.store.get_taxonomy(project, TaxonomyKind::Discipline)?;
        let favorites = self.store.get_favorites(project)?.drawing_set();
        let recents = self.store.get_recents(project)?;

        let ctx = SearchContext {
            drawings: &drawings,
            disciplines: &disciplines,
            favorites: &favorites,
            recents: recents.as_slice(),
            rfis: &rfis,
        };
        Ok(search::search(query, &ctx))
    }

    /// Count what is stored for a project
    pub fn statistics(&self, project: &ProjectId) -> Result<CacheStatistics, StoreError> {
        let mut records = Vec::with_capacity(EntityKind::all().len());
        for kind in EntityKind::all() {
            records.push(KindCount {
                kind: *kind,
                count: self.store.get_records(project, *kind)?.len(),
            });
        }

        let favorites = self.store.get_favorites(project)?;
        Ok(CacheStatistics {
            project: project.clone(),
            records,
            disciplines: self.store.get_taxonomy(project, TaxonomyKind::Discipline)?.len(),
            divisions: self.store.get_taxonomy(project, TaxonomyKind::Division)?.len(),
            favorite_folders: favorites.folders().len(),
            favorite_drawings: favorites.drawing_set().len(),
            recents: self.store.get_recents(project)?.len(),
        })
    }

    pub fn projects(&self) -> Result<Vec<ProjectId>, StoreError> {
        self.store.projects()
    }

    pub fn clear_project(&self, project: &ProjectId) -> Result<(), StoreError> {
        self.store.clear_project(project)?;
        tracing::info!(project = %project, "cleared project");
        Ok(())
    }
}
