//! Taxonomy tables - disciplines and divisions
//!
//! A taxonomy maps an id (stringified, since the source mixes numeric and
//! string ids) to a display name and a sort index. The index preserves the
//! order the host application lists the categories in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sort index for categories the taxonomy does not know; sorts last
pub const UNSORTED_INDEX: i64 = 9999;

/// One taxonomy entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    #[serde(alias = "displayName")]
    pub name: String,

    #[serde(default = "unsorted")]
    pub index: i64,
}

fn unsorted() -> i64 {
    UNSORTED_INDEX
}

impl TaxonomyEntry {
    pub fn new(name: impl Into<String>, index: i64) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// Discipline or division lookup table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxonomyMap(BTreeMap<String, TaxonomyEntry>);

/// Discipline id -> name/index
pub type DisciplineMap = TaxonomyMap;

/// Division id -> name/index
pub type DivisionMap = TaxonomyMap;

impl TaxonomyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TaxonomyEntry> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, key: impl Into<String>, entry: TaxonomyEntry) {
        self.0.insert(key.into(), entry);
    }

    /// Insert only if the key is not taken yet; returns whether it was inserted
    pub fn insert_if_absent(&mut self, key: impl Into<String>, entry: TaxonomyEntry) -> bool {
        match self.0.entry(key.into()) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TaxonomyEntry)> {
        self.0.iter()
    }

    /// Display name for an id
    pub fn name_of(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|e| e.name.as_str())
    }

    /// Sort index for an id, `UNSORTED_INDEX` when unknown
    pub fn index_of(&self, key: &str) -> i64 {
        self.0.get(key).map(|e| e.index).unwrap_or(UNSORTED_INDEX)
    }

    /// Sort index for a display name, `UNSORTED_INDEX` when unknown
    pub fn index_of_name(&self, name: &str) -> i64 {
        self.0
            .values()
            .filter(|e| e.name == name)
            .map(|e| e.index)
            .min()
            .unwrap_or(UNSORTED_INDEX)
    }

    /// Shallow key-union; entries from `incoming` replace same-key entries
    pub fn merge(&mut self, incoming: TaxonomyMap) {
        self.0.extend(incoming.0);
    }

    /// Entries ordered by sort index, then name
    pub fn sorted(&self) -> Vec<(&String, &TaxonomyEntry)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|a, b| a.1.index.cmp(&b.1.index).then_with(|| a.1.name.cmp(&b.1.name)));
        entries
    }
}

impl FromIterator<(String, TaxonomyEntry)> for TaxonomyMap {
    fn from_iter<I: IntoIterator<Item = (String, TaxonomyEntry)>>(iter: I) -> Self {
        TaxonomyMap(iter.into_iter().collect())
    }
}
