//! Feed routed captures into the merge cache

use serde::Serialize;
use serde_json::Value;

use super::router::{route, CapturedRecords};
use crate::core::cache::MergeCache;
use crate::core::identity::{EntityKind, ProjectId, TaxonomyKind};
use crate::core::store::{RecordStore, StoreError};
use crate::entities::TaxonomyMap;

/// What one captured payload contributed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Resolved record kind, `None` when no records were recognized
    pub kind: Option<EntityKind>,
    /// Records that survived classification and normalization
    pub routed: usize,
    /// Records newly added to the cache
    pub added: usize,
    /// Stored records of `kind` after the merge
    pub total: usize,
    /// Discipline entries found in the payload
    pub disciplines: usize,
    /// Division entries found in the payload
    pub divisions: usize,
}

impl IngestReport {
    /// Nothing in the payload was usable
    pub fn is_empty(&self) -> bool {
        self.routed == 0 && self.disciplines == 0 && self.divisions == 0
    }
}

/// Handles captured responses for a merge cache
pub struct Ingestor<'a, S> {
    cache: &'a MergeCache<S>,
}

impl<'a, S: RecordStore> Ingestor<'a, S> {
    pub fn new(cache: &'a MergeCache<S>) -> Self {
        Self { cache }
    }

    /// Route `payload` and merge whatever it held into `project`
    ///
    /// Unrecognized payloads yield an empty report. Only storage failures are
    /// errors.
    pub fn ingest(
        &self,
        project: &ProjectId,
        payload: &Value,
        url: &str,
    ) -> Result<IngestReport, StoreError> {
        let routed = route(payload, url);
        let mut report = IngestReport {
            kind: routed.kind(),
            disciplines: routed.disciplines.len(),
            divisions: routed.divisions.len(),
            ..Default::default()
        };

        if let Some(records) = routed.records.filter(|r| !r.is_empty()) {
            report.routed = records.len();
            let (added, total) = match records {
                CapturedRecords::Drawings(v) => counts(self.cache.merge_counted(project, &v)?),
                CapturedRecords::Rfis(v) => counts(self.cache.merge_counted(project, &v)?),
                CapturedRecords::Commitments(v) => counts(self.cache.merge_counted(project, &v)?),
                CapturedRecords::Specifications(v) => counts(self.cache.merge_counted(project, &v)?),
            };
            report.added = added;
            report.total = total;
        }

        self.merge_taxonomy(project, TaxonomyKind::Discipline, routed.disciplines)?;
        self.merge_taxonomy(project, TaxonomyKind::Division, routed.divisions)?;

        if report.is_empty() {
            tracing::debug!(project = %project, url, "no records captured");
        }
        Ok(report)
    }

    fn merge_taxonomy(
        &self,
        project: &ProjectId,
        kind: TaxonomyKind,
        map: TaxonomyMap,
    ) -> Result<(), StoreError> {
        if !map.is_empty() {
            self.cache.merge_taxonomy(project, kind, map)?;
        }
        Ok(())
    }
}

fn counts<R>(merged: crate::core::cache::Merged<R>) -> (usize, usize) {
    (merged.added, merged.total())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;
    use crate::entities::{Commitment, Drawing, Rfi};
    use serde_json::json;

    fn project() -> ProjectId {
        ProjectId::from("42")
    }

    #[test]
    fn test_drawing_capture_is_stored() {
        let cache = MergeCache::new(MemoryStore::new());
        let payload = json!([{"id": 1, "number": "A-101", "title": "Floor Plan"}]);

        let report = Ingestor::new(&cache)
            .ingest(&project(), &payload, "https://host/projects/42/drawing_log")
            .unwrap();

        assert_eq!(report.kind, Some(EntityKind::Drawing));
        assert_eq!((report.routed, report.added, report.total), (1, 1, 1));
        assert_eq!(
            cache.get::<Drawing>(&project()).unwrap(),
            vec![Drawing::new(1, "A-101", "Floor Plan")]
        );
    }

    #[test]
    fn test_commitment_is_not_a_drawing() {
        let cache = MergeCache::new(MemoryStore::new());
        let payload = json!([
            {"id": 2, "number": "PO-5", "vendor_name": "Acme", "contract_date": "2024-01-01"}
        ]);

        let report = Ingestor::new(&cache)
            .ingest(&project(), &payload, "/projects/42/purchase_orders")
            .unwrap();

        assert_eq!(report.kind, Some(EntityKind::Commitment));
        assert!(cache.get::<Drawing>(&project()).unwrap().is_empty());
        let stored = cache.get::<Commitment>(&project()).unwrap();
        assert_eq!(stored[0].display_vendor(), Some("Acme"));
    }

    #[test]
    fn test_replayed_page_adds_nothing() {
        let cache = MergeCache::new(MemoryStore::new());
        let ingestor = Ingestor::new(&cache);
        let page = json!({"data": [
            {"id": 1, "number": 1, "subject": "Beam", "status": "open"},
            {"id": 2, "number": 2, "subject": "Slab", "status": "closed"}
        ]});

        ingestor.ingest(&project(), &page, "/rfis").unwrap();
        let report = ingestor
            .ingest(&project(), &json!([{"id": 1, "number": 1, "subject": "Beam", "status": "open"}]), "/rfis")
            .unwrap();

        assert_eq!((report.routed, report.added, report.total), (1, 0, 2));
        assert_eq!(cache.get::<Rfi>(&project()).unwrap().len(), 2);
    }

    #[test]
    fn test_discipline_list_feeds_taxonomy() {
        let cache = MergeCache::new(MemoryStore::new());
        let payload = json!([{"id": 3, "name": "Architectural"}, {"id": 7, "name": "Mechanical"}]);

        let report = Ingestor::new(&cache)
            .ingest(&project(), &payload, "/projects/42/drawing_disciplines")
            .unwrap();

        assert_eq!(report.kind, None);
        assert_eq!(report.disciplines, 2);
        let map = cache.get_taxonomy(&project(), TaxonomyKind::Discipline).unwrap();
        assert_eq!(map.name_of("7"), Some("Mechanical"));
    }

    #[test]
    fn test_unrecognized_payload_is_empty() {
        let cache = MergeCache::new(MemoryStore::new());
        let report = Ingestor::new(&cache)
            .ingest(&project(), &json!({"meta": {"page": 1}}), "/projects/42/settings")
            .unwrap();

        assert!(report.is_empty());
        assert!(cache.projects().unwrap().is_empty());
    }
}
