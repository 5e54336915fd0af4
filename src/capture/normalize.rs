//! Mapping raw records onto the normalized model
//!
//! Reference fields are resolved object-first: `discipline: {id, name}` wins
//! over a flat `discipline_name`, `vendor: {name}` over `vendor_name`.
//! Anything that does not resolve stays `None`.

use serde_json::Value;

use super::fields::{as_amount, as_id, as_key, as_text, reference_name, reference_names, text};
use crate::entities::{Commitment, Drawing, Rfi, Specification};

/// Normalize a drawing; `None` if it lacks an integer id or a drawing number
pub fn normalize_drawing(raw: &Value) -> Option<Drawing> {
    let id = raw.get("id").and_then(as_id)?;
    let num = text(raw, "number").or_else(|| text(raw, "drawing_number"))?;

    let (discipline, nested_name) = match raw.get("discipline") {
        Some(Value::Object(obj)) => (
            obj.get("id").and_then(as_id),
            obj.get("name").and_then(as_text),
        ),
        Some(other) => (as_id(other), None),
        None => (None, None),
    };
    let discipline = discipline.or_else(|| raw.get("discipline_id").and_then(as_id));
    let discipline_name = nested_name.or_else(|| text(raw, "discipline_name"));

    Some(Drawing {
        id,
        num,
        title: text(raw, "title").unwrap_or_default(),
        discipline,
        discipline_name,
    })
}

/// Normalize an RFI; `None` without an integer id
pub fn normalize_rfi(raw: &Value) -> Option<Rfi> {
    let id = raw.get("id").and_then(as_id)?;

    let assignee = raw
        .get("assignee")
        .and_then(reference_name)
        .or_else(|| raw.get("assignees").and_then(reference_names))
        .or_else(|| text(raw, "assignee_name"));

    Some(Rfi {
        id,
        number: text(raw, "number").or_else(|| text(raw, "full_number")).unwrap_or_default(),
        subject: text(raw, "subject").unwrap_or_default(),
        status: raw.get("status").and_then(reference_name).unwrap_or_default(),
        created_at: text(raw, "created_at").unwrap_or_default(),
        due_date: text(raw, "due_date"),
        assignee,
        ball_in_court: raw.get("ball_in_court").and_then(reference_names),
    })
}

/// Normalize a commitment; `None` without an integer id
pub fn normalize_commitment(raw: &Value) -> Option<Commitment> {
    let id = raw.get("id").and_then(as_id)?;

    let vendor = match raw.get("vendor") {
        Some(v @ Value::Object(_)) => reference_name(v),
        Some(v) => as_text(v),
        None => None,
    };

    Some(Commitment {
        id,
        number: text(raw, "number").unwrap_or_default(),
        title: text(raw, "title").unwrap_or_default(),
        vendor,
        vendor_name: text(raw, "vendor_name"),
        status: raw.get("status").and_then(reference_name),
        contract_date: text(raw, "contract_date"),
        commitment_type: raw.get("type").and_then(reference_name),
        approved_amount: amount(raw, &["approved_amount", "grand_total"]),
        pending_amount: amount(raw, &["pending_amount", "pending_change_orders_amount"]),
        draft_amount: amount(raw, &["draft_amount", "draft_change_orders_amount"]),
    })
}

/// Normalize a specification section; `None` without an integer id
pub fn normalize_specification(raw: &Value) -> Option<Specification> {
    let id = raw.get("id").and_then(as_id)?;

    let division_id = raw
        .get("divisionId")
        .or_else(|| raw.get("division_id"))
        .and_then(as_key)
        .or_else(|| match raw.get("division") {
            Some(Value::Object(obj)) => obj.get("id").and_then(as_key),
            Some(other) => as_key(other),
            None => None,
        });

    Some(Specification {
        id,
        number: text(raw, "number").unwrap_or_default(),
        title: text(raw, "title")
            .or_else(|| text(raw, "description"))
            .unwrap_or_default(),
        division_id,
    })
}

fn amount(raw: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| raw.get(*k).and_then(as_amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drawing_minimal() {
        let raw = json!({"id": 1, "number": "A-101", "title": "Floor Plan"});
        assert_eq!(
            normalize_drawing(&raw),
            Some(Drawing::new(1, "A-101", "Floor Plan"))
        );
    }

    #[test]
    fn test_drawing_nested_discipline_wins() {
        let raw = json!({
            "id": 2,
            "drawing_number": "M-201",
            "title": "HVAC",
            "discipline": {"id": 7, "name": "Mechanical"},
            "discipline_name": "Flat"
        });
        let drawing = normalize_drawing(&raw).unwrap();
        assert_eq!(drawing.num, "M-201");
        assert_eq!(drawing.discipline, Some(7));
        assert_eq!(drawing.discipline_name.as_deref(), Some("Mechanical"));
    }

    #[test]
    fn test_drawing_flat_discipline_fallback() {
        let raw = json!({"id": 3, "number": "E-1", "discipline": 5, "discipline_name": "Electrical"});
        let drawing = normalize_drawing(&raw).unwrap();
        assert_eq!(drawing.discipline, Some(5));
        assert_eq!(drawing.discipline_name.as_deref(), Some("Electrical"));
        assert_eq!(drawing.title, "");
    }

    #[test]
    fn test_drawing_numeric_number_is_stringified() {
        let raw = json!({"id": "14", "number": 101});
        let drawing = normalize_drawing(&raw).unwrap();
        assert_eq!(drawing.id, 14);
        assert_eq!(drawing.num, "101");
        assert!(drawing.discipline.is_none());
    }

    #[test]
    fn test_drawing_without_integer_id_is_dropped() {
        assert!(normalize_drawing(&json!({"id": "abc", "number": "A-1"})).is_none());
    }

    #[test]
    fn test_rfi_references() {
        let raw = json!({
            "id": 6,
            "number": 0,
            "subject": "Door swing",
            "status": {"name": "Open"},
            "created_at": "2024-02-01T10:00:00Z",
            "due_date": "2024-02-10",
            "assignee": {"id": 3, "name": "Architect"},
            "ball_in_court": [{"name": "Architect"}, {"name": "Engineer"}]
        });
        let rfi = normalize_rfi(&raw).unwrap();
        assert_eq!(rfi.number, "0");
        assert_eq!(rfi.status, "Open");
        assert_eq!(rfi.assignee.as_deref(), Some("Architect"));
        assert_eq!(rfi.ball_in_court.as_deref(), Some("Architect, Engineer"));
        assert_eq!(rfi.due_date.as_deref(), Some("2024-02-10"));
    }

    #[test]
    fn test_rfi_optional_fields_stay_empty() {
        let raw = json!({"id": 6, "number": "4", "subject": "Beam", "status": "open"});
        let rfi = normalize_rfi(&raw).unwrap();
        assert_eq!(rfi.created_at, "");
        assert!(rfi.due_date.is_none());
        assert!(rfi.assignee.is_none());
        assert!(rfi.ball_in_court.is_none());
    }

    #[test]
    fn test_commitment_vendor_object_and_amounts() {
        let raw = json!({
            "id": 2,
            "number": "PO-5",
            "title": "Rebar",
            "vendor": {"id": 1, "name": "Acme Steel"},
            "vendor_name": "Acme",
            "contract_date": "2024-01-01",
            "type": "PurchaseOrderContract",
            "approved_amount": 0,
            "pending_amount": "1,500.50"
        });
        let commitment = normalize_commitment(&raw).unwrap();
        assert_eq!(commitment.vendor.as_deref(), Some("Acme Steel"));
        assert_eq!(commitment.vendor_name.as_deref(), Some("Acme"));
        assert_eq!(commitment.commitment_type.as_deref(), Some("PurchaseOrderContract"));
        assert_eq!(commitment.approved_amount, Some(0.0));
        assert_eq!(commitment.pending_amount, Some(1500.5));
        assert_eq!(commitment.draft_amount, None);
    }

    #[test]
    fn test_commitment_without_vendor_object() {
        let raw = json!({"id": 2, "number": "PO-5", "vendor_name": "Acme", "contract_date": "2024-01-01"});
        let commitment = normalize_commitment(&raw).unwrap();
        assert!(commitment.vendor.is_none());
        assert_eq!(commitment.display_vendor(), Some("Acme"));
        assert!(commitment.approved_amount.is_none());
    }

    #[test]
    fn test_specification_division_variants() {
        let a = normalize_specification(&json!({"id": 1, "number": "03 30 00", "title": "Concrete", "division_id": 3})).unwrap();
        assert_eq!(a.division_id.as_deref(), Some("3"));

        let b = normalize_specification(&json!({"id": 2, "number": "09 90 00", "description": "Painting", "division": {"id": "div-9"}})).unwrap();
        assert_eq!(b.division_id.as_deref(), Some("div-9"));
        assert_eq!(b.title, "Painting");
    }
}
