//! Discipline/division extraction from arbitrary payloads
//!
//! Taxonomy nodes turn up anywhere in a response: as a sibling list of the
//! drawing array, nested inside each drawing, or wrapped in grouping objects.
//! The extractor walks the whole payload depth-first with an explicit stack,
//! bounded to [`MAX_DEPTH`] levels, and collects every `{id, name}` object
//! that is not itself a numbered record.

use std::collections::HashSet;

use serde_json::Value;

use super::fields::{as_key, is_defined};
use crate::entities::{TaxonomyEntry, TaxonomyMap, UNSORTED_INDEX};

/// Deepest level visited; the payload root is level 0
pub const MAX_DEPTH: usize = 5;

/// Keys whose subtrees never hold taxonomy
const SKIPPED_KEYS: &[&str] = &["permissions", "metadata", "view_options"];

struct Frame<'a> {
    value: &'a Value,
    depth: usize,
    /// Index of the nearest enclosing array element
    index: i64,
    /// Direct element of an array
    listed: bool,
}

/// Collect taxonomy entries from a payload
///
/// An entry's sort index is the position of its nearest enclosing array
/// element, so a taxonomy list keeps the order the API returned it in.
/// When an id occurs more than once, an entry that is itself a list element
/// replaces one nested inside another record; otherwise the first wins.
pub fn extract_taxonomy(payload: &Value) -> TaxonomyMap {
    let mut found = TaxonomyMap::new();
    let mut from_list: HashSet<String> = HashSet::new();
    let mut stack = vec![Frame {
        value: payload,
        depth: 0,
        index: UNSORTED_INDEX,
        listed: false,
    }];

    while let Some(frame) = stack.pop() {
        match frame.value {
            Value::Object(obj) => {
                if let Some((key, name)) = taxonomy_node(frame.value) {
                    let entry = TaxonomyEntry::new(name, frame.index);
                    if !frame.listed {
                        found.insert_if_absent(key, entry);
                    } else if from_list.insert(key.clone()) {
                        found.insert(key, entry);
                    }
                }
                if frame.depth >= MAX_DEPTH {
                    continue;
                }
                // Reverse so the stack pops children in document order
                for (key, child) in obj.iter().rev() {
                    if SKIPPED_KEYS.contains(&key.as_str()) || !is_container(child) {
                        continue;
                    }
                    stack.push(Frame {
                        value: child,
                        depth: frame.depth + 1,
                        index: frame.index,
                        listed: false,
                    });
                }
            }
            Value::Array(items) => {
                if frame.depth >= MAX_DEPTH {
                    continue;
                }
                for (i, child) in items.iter().enumerate().rev() {
                    if !is_container(child) {
                        continue;
                    }
                    stack.push(Frame {
                        value: child,
                        depth: frame.depth + 1,
                        index: i as i64,
                        listed: true,
                    });
                }
            }
            _ => {}
        }
    }

    tracing::trace!(entries = found.len(), "taxonomy extracted");
    found
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// `{id, name}` that is not a drawing or numbered record
fn taxonomy_node(node: &Value) -> Option<(String, String)> {
    if is_defined(node, "drawing_number") || is_defined(node, "number") {
        return None;
    }
    let key = node.get("id").and_then(as_key)?;
    let name = node.get("name").and_then(Value::as_str)?;
    if name.trim().is_empty() {
        return None;
    }
    Some((key, name.to_string()))
}
