//! Database schema initialization

use rusqlite::{params, Connection};

use super::StoreError;

/// Current schema version - tables are rebuilt on version mismatch
pub(super) const SCHEMA_VERSION: i32 = 1;

/// Create all tables if missing and stamp the schema version
pub(super) fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );

        -- Captured records, one row per record, in merge order
        CREATE TABLE IF NOT EXISTS records (
            project_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            position INTEGER NOT NULL,
            record_id INTEGER,
            payload TEXT NOT NULL,
            PRIMARY KEY (project_id, kind, position)
        );
        CREATE INDEX IF NOT EXISTS idx_records_id ON records(project_id, kind, record_id);

        -- Discipline and division lookup tables
        CREATE TABLE IF NOT EXISTS taxonomy (
            project_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            key TEXT NOT NULL,
            name TEXT NOT NULL,
            sort_index INTEGER NOT NULL,
            PRIMARY KEY (project_id, kind, key)
        );

        -- Favorite folders; drawings is a JSON array of drawing numbers
        CREATE TABLE IF NOT EXISTS favorite_folders (
            project_id TEXT NOT NULL,
            folder_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            drawings TEXT NOT NULL,
            PRIMARY KEY (project_id, folder_id)
        );

        -- Recently opened drawings, position 0 is the most recent
        CREATE TABLE IF NOT EXISTS recents (
            project_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            num TEXT NOT NULL,
            PRIMARY KEY (project_id, position)
        );
        "#,
    )?;

    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        params![SCHEMA_VERSION],
    )?;

    Ok(())
}

/// Check if the stored schema version differs from the current one
pub(super) fn needs_rebuild(conn: &Connection) -> bool {
    let current: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    current != SCHEMA_VERSION
}

/// Drop all tables and recreate them (the cache is re-capturable, no migrations)
pub(super) fn reinitialize(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS schema_version;
        DROP TABLE IF EXISTS records;
        DROP TABLE IF EXISTS taxonomy;
        DROP TABLE IF EXISTS favorite_folders;
        DROP TABLE IF EXISTS recents;
        "#,
    )?;
    init_schema(conn)
}
