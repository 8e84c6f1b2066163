//! Phone number repository.
//!
//! # Invariants
//! - One row per distinct number; `find_or_create` reuses existing rows.

use crate::model::contact::PhoneNumberRecord;
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// SQLite-backed phone number repository.
pub struct SqlitePhoneNumberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePhoneNumberRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the row holding `number`, inserting it first when absent.
    pub fn find_or_create(&self, number: &str) -> RepoResult<PhoneNumberRecord> {
        self.conn.execute(
            "INSERT OR IGNORE INTO phone_numbers (number) VALUES (?1);",
            [number],
        )?;

        self.get_one(number)?.ok_or_else(|| {
            RepoError::InvalidData("phone row missing after find-or-create insert".to_string())
        })
    }
}

impl Repository for SqlitePhoneNumberRepository<'_> {
    type Record = PhoneNumberRecord;
    type Key = str;

    fn create(&self, record: &PhoneNumberRecord) -> RepoResult<PhoneNumberRecord> {
        self.conn.execute(
            "INSERT INTO phone_numbers (number) VALUES (?1);",
            [record.number.as_str()],
        )?;

        Ok(PhoneNumberRecord {
            id: self.conn.last_insert_rowid(),
            number: record.number.clone(),
        })
    }

    fn get_all(&self) -> RepoResult<Vec<PhoneNumberRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, number FROM phone_numbers ORDER BY id ASC;")?;
        let rows = stmt.query_map([], parse_phone_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_one(&self, key: &str) -> RepoResult<Option<PhoneNumberRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, number FROM phone_numbers WHERE number = ?1;",
                [key],
                parse_phone_row,
            )
            .optional()?;
        Ok(record)
    }

    fn update(&self, record: &PhoneNumberRecord) -> RepoResult<PhoneNumberRecord> {
        let changed = self.conn.execute(
            "UPDATE phone_numbers SET number = ?1 WHERE id = ?2;",
            params![record.number, record.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(record.id));
        }

        Ok(record.clone())
    }

    fn delete(&self, key: &str) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM phone_numbers WHERE number = ?1;", [key])?;
        Ok(removed > 0)
    }

    fn exists(&self, key: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM phone_numbers WHERE number = ?1);",
            [key],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_phone_row(row: &Row<'_>) -> rusqlite::Result<PhoneNumberRecord> {
    Ok(PhoneNumberRecord {
        id: row.get("id")?,
        number: row.get("number")?,
    })
}
