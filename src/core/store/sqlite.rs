//! SQLite-backed record store
//!
//! One database file per workspace holds every project's captured records,
//! taxonomy tables, favorites, and recents. The file is a cache of data the
//! host application owns, so a schema version bump simply rebuilds it.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use serde_json::Value;

use super::schema::{init_schema, needs_rebuild, reinitialize};
use super::{RecordStore, StoreError};
use crate::core::identity::{EntityKind, ProjectId, TaxonomyKind};
use crate::entities::{FavoriteFolder, Favorites, RecentsList, TaxonomyEntry, TaxonomyMap};

/// Tables holding per-project rows
const PROJECT_TABLES: &[&str] = &["records", "taxonomy", "favorite_folders", "recents"];

/// Record store backed by SQLite
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create a store at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let needs_init = !path.exists();
        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        if needs_init {
            init_schema(&conn)?;
        } else if needs_rebuild(&conn) {
            tracing::info!(path = %path.display(), "cache schema changed, rebuilding");
            reinitialize(&conn)?;
        }

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Database file location, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Size of the database file in bytes
    pub fn db_size_bytes(&self) -> u64 {
        self.path
            .as_ref()
            .and_then(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0)
    }

    /// Execute a read-only SQL query, rendering every cell as text
    pub fn query_raw(&self, sql: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(StoreError::NotReadOnly);
        }
        let column_count = stmt.column_count();

        let rows = stmt.query_map([], |row| {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value: String = row
                    .get::<_, rusqlite::types::Value>(i)
                    .map(|v| match v {
                        rusqlite::types::Value::Null => "NULL".to_string(),
                        rusqlite::types::Value::Integer(i) => i.to_string(),
                        rusqlite::types::Value::Real(f) => f.to_string(),
                        rusqlite::types::Value::Text(s) => s,
                        rusqlite::types::Value::Blob(_) => "<blob>".to_string(),
                    })
                    .unwrap_or_default();
                values.push(value);
            }
            Ok(values)
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Column names for a query
    pub fn query_columns(&self, sql: &str) -> Result<Vec<String>, StoreError> {
        let stmt = self.conn.prepare(sql)?;
        Ok(stmt.column_names().iter().map(|s| s.to_string()).collect())
    }
}

impl RecordStore for SqliteStore {
    fn get_records(&self, project: &ProjectId, kind: EntityKind) -> Result<Vec<Value>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM records WHERE project_id = ?1 AND kind = ?2 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![project.as_str(), kind.as_str()], |row| {
            row.get::<_, String>(0)
        })?;

        let mut records = Vec::new();
        for payload in rows {
            records.push(serde_json::from_str(&payload?)?);
        }
        Ok(records)
    }

    fn save_records(
        &self,
        project: &ProjectId,
        kind: EntityKind,
        records: &[Value],
    ) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM records WHERE project_id = ?1 AND kind = ?2",
            params![project.as_str(), kind.as_str()],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO records (project_id, kind, position, record_id, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, record) in records.iter().enumerate() {
                insert.execute(params![
                    project.as_str(),
                    kind.as_str(),
                    position as i64,
                    record.get("id").and_then(Value::as_i64),
                    serde_json::to_string(record)?,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_taxonomy(&self, project: &ProjectId, kind: TaxonomyKind) -> Result<TaxonomyMap, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT key, name, sort_index FROM taxonomy WHERE project_id = ?1 AND kind = ?2",
        )?;
        let rows = stmt.query_map(params![project.as_str(), kind.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                TaxonomyEntry::new(row.get::<_, String>(1)?, row.get::<_, i64>(2)?),
            ))
        })?;

        Ok(rows.collect::<Result<TaxonomyMap, _>>()?)
    }

    fn save_taxonomy(
        &self,
        project: &ProjectId,
        kind: TaxonomyKind,
        map: &TaxonomyMap,
    ) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM taxonomy WHERE project_id = ?1 AND kind = ?2",
            params![project.as_str(), kind.as_str()],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO taxonomy (project_id, kind, key, name, sort_index)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (key, entry) in map.iter() {
                insert.execute(params![
                    project.as_str(),
                    kind.as_str(),
                    key,
                    entry.name,
                    entry.index
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_favorites(&self, project: &ProjectId) -> Result<Favorites, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT folder_id, name, drawings FROM favorite_folders
             WHERE project_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![project.as_str()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut folders = Vec::new();
        for row in rows {
            let (id, name, drawings) = row?;
            let mut folder = FavoriteFolder::new(id, name);
            folder.drawings = serde_json::from_str(&drawings)?;
            folders.push(folder);
        }
        Ok(Favorites::new(folders))
    }

    fn save_favorites(&self, project: &ProjectId, favorites: &Favorites) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM favorite_folders WHERE project_id = ?1",
            params![project.as_str()],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO favorite_folders (project_id, folder_id, position, name, drawings)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, folder) in favorites.folders().iter().enumerate() {
                insert.execute(params![
                    project.as_str(),
                    folder.id,
                    position as i64,
                    folder.name,
                    serde_json::to_string(&folder.drawings)?,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_recents(&self, project: &ProjectId) -> Result<RecentsList, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT num FROM recents WHERE project_id = ?1 ORDER BY position")?;
        let nums = stmt
            .query_map(params![project.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RecentsList::new(nums))
    }

    fn save_recents(&self, project: &ProjectId, recents: &RecentsList) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM recents WHERE project_id = ?1",
            params![project.as_str()],
        )?;
        {
            let mut insert =
                tx.prepare("INSERT INTO recents (project_id, position, num) VALUES (?1, ?2, ?3)")?;
            for (position, num) in recents.as_slice().iter().enumerate() {
                insert.execute(params![project.as_str(), position as i64, num])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn projects(&self) -> Result<Vec<ProjectId>, StoreError> {
        let sql = PROJECT_TABLES
            .iter()
            .map(|t| format!("SELECT project_id FROM {}", t))
            .collect::<Vec<_>>()
            .join(" UNION ")
            + " ORDER BY project_id";

        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids.iter().map(|s| ProjectId::from(s.as_str())).collect())
    }

    fn clear_project(&self, project: &ProjectId) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        for table in PROJECT_TABLES {
            tx.execute(
                &format!("DELETE FROM {} WHERE project_id = ?1", table),
                params![project.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn project(id: &str) -> ProjectId {
        ProjectId::from(id)
    }

    #[test]
    fn test_records_roundtrip_in_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let p = project("100");
        let records = vec![json!({"id": 2, "num": "A-2"}), json!({"id": 1, "num": "A-1"})];

        store.save_records(&p, EntityKind::Drawing, &records).unwrap();

        assert_eq!(store.get_records(&p, EntityKind::Drawing).unwrap(), records);
        assert!(store.get_records(&p, EntityKind::Rfi).unwrap().is_empty());
        assert!(store
            .get_records(&project("200"), EntityKind::Drawing)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_save_overwrites() {
        let store = SqliteStore::open_in_memory().unwrap();
        let p = project("100");
        store
            .save_records(&p, EntityKind::Rfi, &[json!({"id": 1}), json!({"id": 2})])
            .unwrap();
        store.save_records(&p, EntityKind::Rfi, &[json!({"id": 3})]).unwrap();

        assert_eq!(store.get_records(&p, EntityKind::Rfi).unwrap(), vec![json!({"id": 3})]);
    }

    #[test]
    fn test_taxonomy_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let p = project("100");
        let mut map = TaxonomyMap::new();
        map.insert("1", TaxonomyEntry::new("Architectural", 0));
        map.insert("2", TaxonomyEntry::new("Structural", 1));

        store.save_taxonomy(&p, TaxonomyKind::Discipline, &map).unwrap();

        assert_eq!(store.get_taxonomy(&p, TaxonomyKind::Discipline).unwrap(), map);
        assert!(store.get_taxonomy(&p, TaxonomyKind::Division).unwrap().is_empty());
    }

    #[test]
    fn test_favorites_and_recents_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let p = project("100");

        let mut favs = Favorites::default();
        favs.create("Level 1", 10).unwrap();
        favs.create("Level 2", 20).unwrap();
        favs.add_drawing("Level 2", "A-10").unwrap();
        favs.add_drawing("Level 2", "A-2").unwrap();
        store.save_favorites(&p, &favs).unwrap();

        let mut recents = RecentsList::default();
        recents.touch("A-1");
        recents.touch("A-2");
        store.save_recents(&p, &recents).unwrap();

        assert_eq!(store.get_favorites(&p).unwrap(), favs);
        assert_eq!(store.get_recents(&p).unwrap(), recents);
    }

    #[test]
    fn test_projects_and_clear() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .save_records(&project("b"), EntityKind::Drawing, &[json!({"id": 1})])
            .unwrap();
        let mut recents = RecentsList::default();
        recents.touch("A-1");
        store.save_recents(&project("a"), &recents).unwrap();

        assert_eq!(store.projects().unwrap(), vec![project("a"), project("b")]);

        store.clear_project(&project("b")).unwrap();
        assert_eq!(store.projects().unwrap(), vec![project("a")]);
    }

    #[test]
    fn test_reopen_persists() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(".plancache/cache.db");
        let p = project("100");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.save_records(&p, EntityKind::Drawing, &[json!({"id": 1})]).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_records(&p, EntityKind::Drawing).unwrap().len(), 1);
        assert!(store.db_size_bytes() > 0);
    }

    #[test]
    fn test_schema_version_mismatch_rebuilds() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("cache.db");
        let p = project("100");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.save_records(&p, EntityKind::Drawing, &[json!({"id": 1})]).unwrap();
            store.conn.execute("UPDATE schema_version SET version = 0", []).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert!(store.get_records(&p, EntityKind::Drawing).unwrap().is_empty());
    }

    #[test]
    fn test_query_raw_is_read_only() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .save_records(&project("1"), EntityKind::Drawing, &[json!({"id": 7})])
            .unwrap();

        let rows = store
            .query_raw("SELECT record_id, kind FROM records")
            .unwrap();
        assert_eq!(rows, vec![vec!["7".to_string(), "drawings".to_string()]]);
        assert_eq!(
            store.query_columns("SELECT record_id, kind FROM records").unwrap(),
            vec!["record_id", "kind"]
        );
        assert!(matches!(
            store.query_raw("DELETE FROM records"),
            Err(StoreError::NotReadOnly)
        ));
    }
}
