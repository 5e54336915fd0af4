//! Record classification by field presence
//!
//! The host API returns untyped records, and one endpoint can hand back
//! drawings, commitments, or RFIs depending on optional fields. These
//! predicates decide which kind a record is. They run in a fixed precedence
//! (drawing, commitment, RFI) and each carries exclusion rules so a record
//! satisfies at most one of them.
//!
//! Specifications share the drawing shape and have no reliable tell of their
//! own; they are only ever identified from the source URL by the router.

use serde_json::Value;

use super::fields::{is_defined, is_present, is_truthy};
use crate::core::identity::EntityKind;

/// Fields that mark a record as a commitment
const COMMITMENT_TELLS: &[&str] = &["vendor", "vendor_name", "contract_date"];

/// Outcome of classifying one raw record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classified<'a> {
    pub kind: Option<EntityKind>,
    pub raw: &'a Value,
}

impl Classified<'_> {
    pub fn is_unknown(&self) -> bool {
        self.kind.is_none()
    }
}

/// Classify a raw record by content; `kind` is `None` for unrecognized shapes
///
/// Never yields `EntityKind::Specification`.
pub fn classify(raw: &Value) -> Classified<'_> {
    let kind = if !has_id(raw) {
        None
    } else if is_drawing(raw) {
        Some(EntityKind::Drawing)
    } else if is_commitment(raw) {
        Some(EntityKind::Commitment)
    } else if is_rfi(raw) {
        Some(EntityKind::Rfi)
    } else {
        None
    };

    Classified { kind, raw }
}

/// Test a record against a single kind's predicate
pub fn matches_kind(raw: &Value, kind: EntityKind) -> bool {
    if !has_id(raw) {
        return false;
    }
    match kind {
        EntityKind::Drawing => is_drawing(raw),
        EntityKind::Commitment => is_commitment(raw),
        EntityKind::Rfi => is_rfi(raw),
        EntityKind::Specification => is_specification_shaped(raw),
    }
}

/// Every record must carry a truthy `id`
pub fn has_id(raw: &Value) -> bool {
    raw.is_object() && is_truthy(raw, "id")
}

/// A drawing number and no commitment or RFI tells
pub fn is_drawing(raw: &Value) -> bool {
    let has_number = is_present(raw, "number") || is_present(raw, "drawing_number");
    has_number && !has_commitment_tell(raw) && !has_rfi_tells(raw)
}

/// An info signal plus a context signal, and never a drawing number
pub fn is_commitment(raw: &Value) -> bool {
    if is_present(raw, "drawing_number") {
        return false;
    }

    let has_info = ["number", "title", "contract_date"]
        .iter()
        .any(|k| is_present(raw, k));
    let has_context = is_present(raw, "vendor")
        || is_present(raw, "vendor_name")
        || raw
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|t| t.contains("Contract"));

    has_info && has_context
}

/// Subject, status and number, with no drawing or vendor fields
pub fn is_rfi(raw: &Value) -> bool {
    if is_present(raw, "drawing_number")
        || is_present(raw, "vendor")
        || is_present(raw, "vendor_name")
    {
        return false;
    }
    has_rfi_tells(raw) && is_defined(raw, "number")
}

/// Loose shape check used when the URL already says "specifications"
pub fn is_specification_shaped(raw: &Value) -> bool {
    is_present(raw, "number") || is_present(raw, "title") || is_present(raw, "description")
}

fn has_commitment_tell(raw: &Value) -> bool {
    COMMITMENT_TELLS.iter().any(|k| is_present(raw, k))
}

fn has_rfi_tells(raw: &Value) -> bool {
    is_truthy(raw, "subject") && is_truthy(raw, "status")
}
