//! Store repository.
//!
//! # Invariants
//! - Store names are unique; `find_or_create` reuses existing rows.
//! - `delete_by_id` exists for the orphaned-store sweep after product
//!   removal, where the caller only holds the referenced id.

use crate::model::contact::RecordId;
use crate::model::product::StoreRecord;
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// SQLite-backed store repository.
pub struct SqliteStoreRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStoreRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the row named `name`, inserting it first when absent.
    pub fn find_or_create(&self, name: &str) -> RepoResult<StoreRecord> {
        self.conn
            .execute("INSERT OR IGNORE INTO stores (name) VALUES (?1);", [name])?;

        self.get_one(name)?.ok_or_else(|| {
            RepoError::InvalidData("store row missing after find-or-create insert".to_string())
        })
    }

    /// Deletes one store by id. Returns whether a row existed.
    pub fn delete_by_id(&self, id: RecordId) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM stores WHERE id = ?1;", [id])?;
        Ok(removed > 0)
    }
}

impl Repository for SqliteStoreRepository<'_> {
    type Record = StoreRecord;
    type Key = str;

    fn create(&self, record: &StoreRecord) -> RepoResult<StoreRecord> {
        self.conn
            .execute("INSERT INTO stores (name) VALUES (?1);", [record.name.as_str()])?;

        Ok(StoreRecord {
            id: self.conn.last_insert_rowid(),
            name: record.name.clone(),
        })
    }

    fn get_all(&self) -> RepoResult<Vec<StoreRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM stores ORDER BY id ASC;")?;
        let rows = stmt.query_map([], parse_store_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_one(&self, key: &str) -> RepoResult<Option<StoreRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, name FROM stores WHERE name = ?1;",
                [key],
                parse_store_row,
            )
            .optional()?;
        Ok(record)
    }

    fn update(&self, record: &StoreRecord) -> RepoResult<StoreRecord> {
        let changed = self.conn.execute(
            "UPDATE stores SET name = ?1 WHERE id = ?2;",
            params![record.name, record.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(record.id));
        }

        Ok(record.clone())
    }

    fn delete(&self, key: &str) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM stores WHERE name = ?1;", [key])?;
        Ok(removed > 0)
    }

    fn exists(&self, key: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM stores WHERE name = ?1);",
            [key],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_store_row(row: &Row<'_>) -> rusqlite::Result<StoreRecord> {
    Ok(StoreRecord {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
