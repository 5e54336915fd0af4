//! Favorite folders and the recently-opened list
//!
//! Both are keyed by drawing number (`Drawing::num`), not by record id.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::natural::natural_cmp;

/// Maximum number of recent drawings remembered per project
pub const MAX_RECENTS: usize = 5;

/// A named folder of favorite drawings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteFolder {
    /// Creation timestamp in milliseconds
    pub id: i64,

    pub name: String,

    /// Drawing numbers, kept sorted with numeric-aware ordering
    #[serde(default)]
    pub drawings: Vec<String>,
}

impl FavoriteFolder {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            drawings: Vec::new(),
        }
    }

    /// Add a drawing number; returns false if it was already present
    pub fn add(&mut self, num: &str) -> bool {
        if self.drawings.iter().any(|d| d == num) {
            return false;
        }
        self.drawings.push(num.to_string());
        self.normalize();
        true
    }

    /// Remove a drawing number; returns false if it was not present
    pub fn remove(&mut self, num: &str) -> bool {
        let before = self.drawings.len();
        self.drawings.retain(|d| d != num);
        self.normalize();
        self.drawings.len() != before
    }

    pub fn contains(&self, num: &str) -> bool {
        self.drawings.iter().any(|d| d == num)
    }

    fn normalize(&mut self) {
        self.drawings.sort_by(|a, b| natural_cmp(a, b));
        self.drawings.dedup();
    }
}

/// All favorite folders of one project, in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    folders: Vec<FavoriteFolder>,
}

impl Favorites {
    pub fn new(folders: Vec<FavoriteFolder>) -> Self {
        let mut favorites = Self { folders };
        for folder in &mut favorites.folders {
            folder.normalize();
        }
        favorites
    }

    pub fn folders(&self) -> &[FavoriteFolder] {
        &self.folders
    }

    pub fn into_folders(self) -> Vec<FavoriteFolder> {
        self.folders
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Create a folder; `now_ms` becomes its id unless that id is taken
    pub fn create(&mut self, name: &str, now_ms: i64) -> Result<&FavoriteFolder, FavoritesError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FavoritesError::EmptyName);
        }
        if self.position_by_name(name).is_some() {
            return Err(FavoritesError::DuplicateName(name.to_string()));
        }

        let mut id = now_ms;
        while self.folders.iter().any(|f| f.id == id) {
            id += 1;
        }

        self.folders.push(FavoriteFolder::new(id, name));
        Ok(&self.folders[self.folders.len() - 1])
    }

    /// Look up a folder by id or by case-insensitive name
    pub fn find(&self, key: &str) -> Option<&FavoriteFolder> {
        self.position(key).map(|i| &self.folders[i])
    }

    pub fn rename(&mut self, key: &str, new_name: &str) -> Result<(), FavoritesError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(FavoritesError::EmptyName);
        }
        let idx = self.require(key)?;
        if let Some(other) = self.position_by_name(new_name) {
            if other != idx {
                return Err(FavoritesError::DuplicateName(new_name.to_string()));
            }
        }
        self.folders[idx].name = new_name.to_string();
        Ok(())
    }

    pub fn delete(&mut self, key: &str) -> Result<FavoriteFolder, FavoritesError> {
        let idx = self.require(key)?;
        Ok(self.folders.remove(idx))
    }

    pub fn add_drawing(&mut self, key: &str, num: &str) -> Result<bool, FavoritesError> {
        let idx = self.require(key)?;
        Ok(self.folders[idx].add(num))
    }

    pub fn remove_drawing(&mut self, key: &str, num: &str) -> Result<bool, FavoritesError> {
        let idx = self.require(key)?;
        Ok(self.folders[idx].remove(num))
    }

    /// Union of all folders' drawing numbers
    pub fn drawing_set(&self) -> HashSet<String> {
        self.folders
            .iter()
            .flat_map(|f| f.drawings.iter().cloned())
            .collect()
    }

    fn require(&self, key: &str) -> Result<usize, FavoritesError> {
        self.position(key)
            .ok_or_else(|| FavoritesError::FolderNotFound(key.to_string()))
    }

    fn position(&self, key: &str) -> Option<usize> {
        if let Ok(id) = key.trim().parse::<i64>() {
            if let Some(i) = self.folders.iter().position(|f| f.id == id) {
                return Some(i);
            }
        }
        self.position_by_name(key)
    }

    fn position_by_name(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.folders
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// Recently opened drawing numbers, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentsList(Vec<String>);

impl RecentsList {
    pub fn new(nums: Vec<String>) -> Self {
        let mut list = RecentsList(Vec::with_capacity(MAX_RECENTS));
        // Oldest first so the original front ends up in front again
        for num in nums.into_iter().rev() {
            list.touch(&num);
        }
        list
    }

    /// Move or insert `num` to the front, dropping the oldest beyond the cap
    pub fn touch(&mut self, num: &str) {
        self.0.retain(|n| n != num);
        self.0.insert(0, num.to_string());
        self.0.truncate(MAX_RECENTS);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Errors from favorite folder operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FavoritesError {
    #[error("no favorite folder matches '{0}'")]
    FolderNotFound(String),

    #[error("a favorite folder named '{0}' already exists")]
    DuplicateName(String),

    #[error("folder name cannot be empty")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_sorts_numerically_on_every_mutation() {
        let mut folder = FavoriteFolder::new(1, "Site");
        folder.add("A-10");
        folder.add("A-2");
        folder.add("A-1");
        assert_eq!(folder.drawings, vec!["A-1", "A-2", "A-10"]);

        assert!(!folder.add("A-2"));
        assert!(folder.remove("A-1"));
        assert!(!folder.remove("A-1"));
        assert_eq!(folder.drawings, vec!["A-2", "A-10"]);
    }

    #[test]
    fn test_create_bumps_colliding_ids() {
        let mut favs = Favorites::default();
        let first = favs.create("Level 1", 1_700_000_000_000).unwrap().id;
        let second = favs.create("Level 2", 1_700_000_000_000).unwrap().id;
        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_create_rejects_duplicates_and_blank_names() {
        let mut favs = Favorites::default();
        favs.create("MEP", 1).unwrap();
        assert_eq!(
            favs.create("mep", 2).unwrap_err(),
            FavoritesError::DuplicateName("mep".into())
        );
        assert_eq!(favs.create("  ", 3).unwrap_err(), FavoritesError::EmptyName);
    }

    #[test]
    fn test_find_by_id_or_name() {
        let mut favs = Favorites::default();
        favs.create("Structure", 42).unwrap();
        assert_eq!(favs.find("42").unwrap().name, "Structure");
        assert_eq!(favs.find("structure").unwrap().id, 42);
        assert!(favs.find("nope").is_none());
    }

    #[test]
    fn test_rename_and_delete() {
        let mut favs = Favorites::default();
        favs.create("Old", 1).unwrap();
        favs.create("Other", 2).unwrap();

        assert!(favs.rename("Old", "Other").is_err());
        favs.rename("Old", "New").unwrap();
        assert!(favs.find("New").is_some());

        let removed = favs.delete("1").unwrap();
        assert_eq!(removed.name, "New");
        assert!(matches!(
            favs.delete("1"),
            Err(FavoritesError::FolderNotFound(_))
        ));
    }

    #[test]
    fn test_drawing_set_is_union() {
        let mut favs = Favorites::default();
        favs.create("A", 1).unwrap();
        favs.create("B", 2).unwrap();
        favs.add_drawing("A", "A-101").unwrap();
        favs.add_drawing("B", "A-101").unwrap();
        favs.add_drawing("B", "S-201").unwrap();

        let set = favs.drawing_set();
        assert_eq!(set.len(), 2);
        assert!(set.contains("S-201"));
    }

    #[test]
    fn test_recents_dedupe_and_cap() {
        let mut recents = RecentsList::default();
        for num in ["A-1", "A-2", "A-3", "A-4", "A-5", "A-6"] {
            recents.touch(num);
        }
        assert_eq!(recents.as_slice(), &["A-6", "A-5", "A-4", "A-3", "A-2"]);

        recents.touch("A-4");
        assert_eq!(recents.as_slice(), &["A-4", "A-6", "A-5", "A-3", "A-2"]);
    }

    #[test]
    fn test_recents_new_keeps_order() {
        let recents = RecentsList::new(vec!["B".into(), "A".into(), "B".into()]);
        assert_eq!(recents.as_slice(), &["B", "A"]);
    }
}
