//! Field probing helpers for untyped JSON records

use serde_json::Value;

/// Key present with a non-null value
pub fn is_present(raw: &Value, key: &str) -> bool {
    raw.get(key).is_some_and(|v| !v.is_null())
}

/// Key present at all, whatever its value
pub fn is_defined(raw: &Value, key: &str) -> bool {
    raw.as_object().is_some_and(|obj| obj.contains_key(key))
}

/// Key present with a truthy value
pub fn is_truthy(raw: &Value, key: &str) -> bool {
    raw.get(key).is_some_and(truthy)
}

/// JSON truthiness: null, false, 0, NaN and "" are falsy
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Integer id from a number or an integer-valued string
pub fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Taxonomy key from a string or numeric id
pub fn as_key(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Scalar rendered as text; numbers and booleans are stringified
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Floating point amount from a number or numeric string
pub fn as_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

/// Text field by key, skipping null
pub fn text(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(as_text)
}

/// Display name of a reference: a string, or an object's `name`/`display_name`/`login`
pub fn reference_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => ["name", "display_name", "displayName", "login"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(as_text))
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Comma-joined names of a reference or a list of references
pub fn reference_names(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let names: Vec<String> = items.iter().filter_map(reference_name).collect();
            (!names.is_empty()).then(|| names.join(", "))
        }
        other => reference_name(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_present_vs_defined() {
        let raw = json!({"a": null, "b": 0});
        assert!(!is_present(&raw, "a"));
        assert!(is_defined(&raw, "a"));
        assert!(is_present(&raw, "b"));
        assert!(!is_defined(&raw, "c"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(false)));
        assert!(truthy(&json!("open")));
        assert!(truthy(&json!(3)));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));
    }

    #[test]
    fn test_as_id() {
        assert_eq!(as_id(&json!(42)), Some(42));
        assert_eq!(as_id(&json!("42")), Some(42));
        assert_eq!(as_id(&json!(4.0)), Some(4));
        assert_eq!(as_id(&json!(4.5)), None);
        assert_eq!(as_id(&json!("abc")), None);
        assert_eq!(as_id(&json!(null)), None);
    }

    #[test]
    fn test_as_amount() {
        assert_eq!(as_amount(&json!(12.5)), Some(12.5));
        assert_eq!(as_amount(&json!("1,250.00")), Some(1250.0));
        assert_eq!(as_amount(&json!(null)), None);
    }

    #[test]
    fn test_reference_names() {
        assert_eq!(reference_name(&json!({"name": "Acme"})), Some("Acme".into()));
        assert_eq!(reference_name(&json!("Acme")), Some("Acme".into()));
        assert_eq!(reference_name(&json!({"id": 1})), None);
        assert_eq!(
            reference_names(&json!([{"name": "Architect"}, {"login": "gc@example.com"}])),
            Some("Architect, gc@example.com".into())
        );
        assert_eq!(reference_names(&json!([])), None);
    }
}
