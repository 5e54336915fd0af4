//! Payload routing: find the records, pick their kind, normalize them
//!
//! Captured responses have no common envelope. The router locates the record
//! array, combines URL hints with the shape of the first record to decide
//! what the array holds, and normalizes every record that passes that kind's
//! classifier. Anything it cannot place yields an empty capture, never an
//! error.

use serde_json::Value;

use super::classify::{
    classify, has_id, is_commitment, is_drawing, is_rfi, is_specification_shaped, matches_kind,
};
use super::normalize::{
    normalize_commitment, normalize_drawing, normalize_rfi, normalize_specification,
};
use super::taxonomy::extract_taxonomy;
use crate::core::identity::EntityKind;
use crate::entities::{Commitment, DisciplineMap, DivisionMap, Drawing, Rfi, Specification};

/// Source hints derived from the capture URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlHints {
    pub commitment: bool,
    pub rfi: bool,
    pub specification: bool,
    /// URL names disciplines explicitly
    pub discipline: bool,
}

impl UrlHints {
    pub fn from_url(url: &str) -> Self {
        let url = url.to_lowercase();
        let discipline = url.contains("discipline");
        Self {
            commitment: url.contains("commitment") || url.contains("contract"),
            rfi: url.contains("/rfis"),
            specification: url.contains("specification"),
            discipline,
        }
    }

    /// Whether the URL points away from drawings
    pub fn is_strong(&self) -> bool {
        self.commitment || self.rfi
    }
}

/// Normalized records of a single kind
#[derive(Debug, Clone, PartialEq)]
pub enum CapturedRecords {
    Drawings(Vec<Drawing>),
    Rfis(Vec<Rfi>),
    Commitments(Vec<Commitment>),
    Specifications(Vec<Specification>),
}

impl CapturedRecords {
    pub fn kind(&self) -> EntityKind {
        match self {
            CapturedRecords::Drawings(_) => EntityKind::Drawing,
            CapturedRecords::Rfis(_) => EntityKind::Rfi,
            CapturedRecords::Commitments(_) => EntityKind::Commitment,
            CapturedRecords::Specifications(_) => EntityKind::Specification,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CapturedRecords::Drawings(v) => v.len(),
            CapturedRecords::Rfis(v) => v.len(),
            CapturedRecords::Commitments(v) => v.len(),
            CapturedRecords::Specifications(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one payload yielded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutedCapture {
    pub records: Option<CapturedRecords>,
    pub disciplines: DisciplineMap,
    pub divisions: DivisionMap,
}

impl RoutedCapture {
    pub fn kind(&self) -> Option<EntityKind> {
        self.records.as_ref().map(CapturedRecords::kind)
    }

    /// Nothing usable was found
    pub fn is_empty(&self) -> bool {
        self.records.as_ref().map_or(true, CapturedRecords::is_empty)
            && self.disciplines.is_empty()
            && self.divisions.is_empty()
    }
}

/// Route one captured payload
pub fn route(payload: &Value, url: &str) -> RoutedCapture {
    let hints = UrlHints::from_url(url);
    let records = locate_records(payload).unwrap_or(&[]);
    let kind = records.first().and_then(|first| resolve_kind(first, &hints));

    tracing::debug!(url, ?hints, records = records.len(), ?kind, "routing payload");

    let mut routed = RoutedCapture {
        records: kind.map(|k| normalize_all(records, k)),
        ..Default::default()
    };

    // Discipline nodes are often siblings of the drawing array, so scan the whole payload
    if kind == Some(EntityKind::Drawing) || hints.discipline {
        routed.disciplines = extract_taxonomy(payload);
    }
    if kind == Some(EntityKind::Specification) {
        routed.divisions = extract_taxonomy(payload);
    }

    if routed.is_empty() {
        tracing::debug!(url, "payload ignored");
    }
    routed
}

/// Find the record array inside an arbitrary wrapper
pub fn locate_records(payload: &Value) -> Option<&[Value]> {
    match payload {
        Value::Array(items) => Some(items.as_slice()),
        Value::Object(obj) => ["data", "entities"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array))
            .or_else(|| {
                obj.values()
                    .filter_map(Value::as_array)
                    .find(|items| !items.is_empty())
            })
            .map(Vec::as_slice),
        _ => None,
    }
}

/// Decide the array's kind from URL hints and the first record
pub fn resolve_kind(first: &Value, hints: &UrlHints) -> Option<EntityKind> {
    if !has_id(first) {
        return None;
    }
    if hints.commitment && is_commitment(first) {
        return Some(EntityKind::Commitment);
    }
    if hints.rfi && is_rfi(first) {
        return Some(EntityKind::Rfi);
    }
    if hints.specification && is_specification_shaped(first) {
        return Some(EntityKind::Specification);
    }
    if !hints.is_strong() && is_drawing(first) {
        return Some(EntityKind::Drawing);
    }
    // Content decides when the URL is silent or disagrees, but a strong
    // non-drawing hint never falls back to drawings
    classify(first)
        .kind
        .filter(|k| *k != EntityKind::Drawing)
}

fn normalize_all(records: &[Value], kind: EntityKind) -> CapturedRecords {
    let matching = records.iter().filter(|r| matches_kind(r, kind));
    match kind {
        EntityKind::Drawing => CapturedRecords::Drawings(matching.filter_map(normalize_drawing).collect()),
        EntityKind::Rfi => CapturedRecords::Rfis(matching.filter_map(normalize_rfi).collect()),
        EntityKind::Commitment => {
            CapturedRecords::Commitments(matching.filter_map(normalize_commitment).collect())
        }
        EntityKind::Specification => {
            CapturedRecords::Specifications(matching.filter_map(normalize_specification).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_hints() {
        let h = UrlHints::from_url("https://app.example.com/rest/v1.0/projects/1/Commitments");
        assert!(h.commitment && h.is_strong());

        let h = UrlHints::from_url("/rest/v1.0/projects/1/drawing_log");
        assert_eq!(h, UrlHints::default());

        let h = UrlHints::from_url("/projects/1/drawing_disciplines");
        assert!(h.discipline && !h.is_strong());

        let h = UrlHints::from_url("/projects/1/rfis?page=2");
        assert!(h.rfi);

        let h = UrlHints::from_url("/projects/1/specification_sections");
        assert!(h.specification);
    }

    #[test]
    fn test_locate_records_shapes() {
        let bare = json!([{"id": 1}]);
        assert_eq!(locate_records(&bare).unwrap().len(), 1);

        let data = json!({"data": [{"id": 1}, {"id": 2}], "other": [{"id": 3}]});
        assert_eq!(locate_records(&data).unwrap().len(), 2);

        let entities = json!({"entities": [{"id": 1}]});
        assert_eq!(locate_records(&entities).unwrap().len(), 1);

        let scan = json!({"total": 2, "empty": [], "drawings": [{"id": 1}, {"id": 2}]});
        assert_eq!(locate_records(&scan).unwrap().len(), 2);

        assert!(locate_records(&json!({"total": 2})).is_none());
        assert!(locate_records(&json!("nope")).is_none());
    }

    #[test]
    fn test_drawing_log_payload() {
        let payload = json!([{"id": 1, "number": "A-101", "title": "Floor Plan"}]);
        let routed = route(&payload, "https://host/projects/9/drawing_log");

        assert_eq!(
            routed.records,
            Some(CapturedRecords::Drawings(vec![Drawing::new(1, "A-101", "Floor Plan")]))
        );
    }

    #[test]
    fn test_commitment_payload_with_strong_hint() {
        let payload = json!({"data": [
            {"id": 2, "number": "PO-5", "vendor_name": "Acme", "contract_date": "2024-01-01"},
            {"id": 3, "number": "SC-1", "title": "Concrete", "type": "WorkOrderContract"},
            {"id": 4, "name": "not a commitment"}
        ]});
        let routed = route(&payload, "/projects/9/commitments");

        assert_eq!(routed.kind(), Some(EntityKind::Commitment));
        assert_eq!(routed.records.as_ref().unwrap().len(), 2);
        assert!(routed.disciplines.is_empty());
    }

    #[test]
    fn test_rfi_payload() {
        let payload = json!([
            {"id": 5, "number": 1, "subject": "Beam", "status": "open"},
            {"id": 6, "number": 2, "subject": "Slab", "status": "closed"}
        ]);
        let routed = route(&payload, "/rest/v1.0/projects/9/rfis");
        match routed.records {
            Some(CapturedRecords::Rfis(rfis)) => {
                assert_eq!(rfis.len(), 2);
                assert_eq!(rfis[0].number, "1");
            }
            other => panic!("expected RFIs, got {:?}", other),
        }
    }

    #[test]
    fn test_rfis_without_url_hint_still_classify() {
        let payload = json!([{"id": 5, "number": 1, "subject": "Beam", "status": "open"}]);
        assert_eq!(route(&payload, "/api/unknown").kind(), Some(EntityKind::Rfi));
    }

    #[test]
    fn test_strong_hint_never_falls_back_to_drawings() {
        let payload = json!([{"id": 1, "number": "A-101", "title": "Floor Plan"}]);
        assert!(route(&payload, "/projects/1/commitments").records.is_none());
    }

    #[test]
    fn test_mixed_array_filters_by_first_kind() {
        let payload = json!([
            {"id": 1, "number": "A-101", "title": "Floor Plan"},
            {"id": 2, "number": "PO-5", "vendor_name": "Acme"},
            {"id": 3, "drawing_number": "A-102", "title": "Roof Plan"}
        ]);
        let routed = route(&payload, "/drawings");
        match routed.records {
            Some(CapturedRecords::Drawings(d)) => {
                let nums: Vec<_> = d.iter().map(|x| x.num.as_str()).collect();
                assert_eq!(nums, vec!["A-101", "A-102"]);
            }
            other => panic!("expected drawings, got {:?}", other),
        }
    }

    #[test]
    fn test_drawing_payload_collects_sibling_disciplines() {
        let payload = json!({
            "drawings": [{"id": 1, "number": "M-1", "discipline": 7}],
            "disciplines": [{"id": 3, "name": "Architectural"}, {"id": 7, "name": "Mechanical"}]
        });
        let routed = route(&payload, "/drawing_log");
        assert_eq!(routed.kind(), Some(EntityKind::Drawing));
        assert_eq!(routed.disciplines.name_of("7"), Some("Mechanical"));
        assert_eq!(routed.disciplines.index_of("7"), 1);
    }

    #[test]
    fn test_standalone_discipline_list() {
        let payload = json!([{"id": 3, "name": "Architectural"}, {"id": 7, "name": "Mechanical"}]);
        let routed = route(&payload, "/projects/1/drawing_disciplines");
        assert!(routed.records.is_none());
        assert_eq!(routed.disciplines.len(), 2);
    }

    #[test]
    fn test_specification_payload_by_url() {
        let payload = json!({"data": [
            {"id": 11, "number": "03 30 00", "title": "Concrete", "division": {"id": 3, "name": "Concrete"}}
        ]});
        let routed = route(&payload, "/projects/1/specification_sections");
        assert_eq!(routed.kind(), Some(EntityKind::Specification));
        assert_eq!(routed.divisions.name_of("3"), Some("Concrete"));
    }

    #[test]
    fn test_garbage_is_silently_ignored() {
        for payload in [json!(null), json!(42), json!({}), json!([]), json!([1, 2, 3]), json!({"data": "x"})] {
            let routed = route(&payload, "/drawing_log");
            assert!(routed.is_empty(), "payload {} produced records", payload);
        }
    }
}
