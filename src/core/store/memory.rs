//! In-process record store

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{RecordStore, StoreError};
use crate::core::identity::{EntityKind, ProjectId, TaxonomyKind};
use crate::entities::{Favorites, RecentsList, TaxonomyMap};

/// Record store holding everything in a mutex-guarded map
///
/// Values are kept as JSON so a round trip through this store behaves the
/// same as one through [`super::SqliteStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: Mutex<HashMap<(ProjectId, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn load<T: DeserializeOwned + Default>(
        &self,
        project: &ProjectId,
        bucket: &str,
    ) -> Result<T, StoreError> {
        let buckets = self.buckets.lock().map_err(|_| StoreError::Poisoned)?;
        match buckets.get(&(project.clone(), bucket.to_string())) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(T::default()),
        }
    }

    fn store<T: Serialize + ?Sized>(
        &self,
        project: &ProjectId,
        bucket: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        let mut buckets = self.buckets.lock().map_err(|_| StoreError::Poisoned)?;
        buckets.insert((project.clone(), bucket.to_string()), value);
        Ok(())
    }
}

fn taxonomy_bucket(kind: TaxonomyKind) -> String {
    format!("taxonomy:{}", kind.as_str())
}

impl RecordStore for MemoryStore {
    fn get_records(&self, project: &ProjectId, kind: EntityKind) -> Result<Vec<Value>, StoreError> {
        self.load(project, kind.as_str())
    }

    fn save_records(
        &self,
        project: &ProjectId,
        kind: EntityKind,
        records: &[Value],
    ) -> Result<(), StoreError> {
        self.store(project, kind.as_str(), records)
    }

    fn get_taxonomy(&self, project: &ProjectId, kind: TaxonomyKind) -> Result<TaxonomyMap, StoreError> {
        self.load(project, &taxonomy_bucket(kind))
    }

    fn save_taxonomy(
        &self,
        project: &ProjectId,
        kind: TaxonomyKind,
        map: &TaxonomyMap,
    ) -> Result<(), StoreError> {
        self.store(project, &taxonomy_bucket(kind), map)
    }

    fn get_favorites(&self, project: &ProjectId) -> Result<Favorites, StoreError> {
        self.load(project, "favorites")
    }

    fn save_favorites(&self, project: &ProjectId, favorites: &Favorites) -> Result<(), StoreError> {
        self.store(project, "favorites", favorites)
    }

    fn get_recents(&self, project: &ProjectId) -> Result<RecentsList, StoreError> {
        self.load(project, "recents")
    }

    fn save_recents(&self, project: &ProjectId, recents: &RecentsList) -> Result<(), StoreError> {
        self.store(project, "recents", recents)
    }

    fn projects(&self) -> Result<Vec<ProjectId>, StoreError> {
        let buckets = self.buckets.lock().map_err(|_| StoreError::Poisoned)?;
        let ids: BTreeSet<ProjectId> = buckets.keys().map(|(p, _)| p.clone()).collect();
        Ok(ids.into_iter().collect())
    }

    fn clear_project(&self, project: &ProjectId) -> Result<(), StoreError> {
        let mut buckets = self.buckets.lock().map_err(|_| StoreError::Poisoned)?;
        buckets.retain(|(p, _), _| p != project);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TaxonomyEntry;
    use serde_json::json;

    #[test]
    fn test_empty_by_default() {
        let store = MemoryStore::new();
        let p = ProjectId::from("1");
        assert!(store.get_records(&p, EntityKind::Drawing).unwrap().is_empty());
        assert!(store.get_taxonomy(&p, TaxonomyKind::Discipline).unwrap().is_empty());
        assert!(store.get_favorites(&p).unwrap().is_empty());
        assert!(store.get_recents(&p).unwrap().is_empty());
        assert!(store.projects().unwrap().is_empty());
    }

    #[test]
    fn test_buckets_are_isolated() {
        let store = MemoryStore::new();
        let a = ProjectId::from("a");
        let b = ProjectId::from("b");
        store.save_records(&a, EntityKind::Rfi, &[json!({"id": 1})]).unwrap();

        let mut map = TaxonomyMap::new();
        map.insert("9", TaxonomyEntry::new("Civil", 3));
        store.save_taxonomy(&b, TaxonomyKind::Division, &map).unwrap();

        assert_eq!(store.get_records(&a, EntityKind::Rfi).unwrap().len(), 1);
        assert!(store.get_records(&a, EntityKind::Drawing).unwrap().is_empty());
        assert!(store.get_records(&b, EntityKind::Rfi).unwrap().is_empty());
        assert_eq!(store.get_taxonomy(&b, TaxonomyKind::Division).unwrap(), map);
        assert!(store.get_taxonomy(&b, TaxonomyKind::Discipline).unwrap().is_empty());
        assert_eq!(store.projects().unwrap(), vec![a.clone(), b.clone()]);

        store.clear_project(&a).unwrap();
        assert_eq!(store.projects().unwrap(), vec![b]);
    }
}
