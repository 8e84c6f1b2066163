//! Address repository: SQLite CRUD plus find-or-create deduplication.
//!
//! # Invariants
//! - `find_or_create` never inserts a second row for an identical
//!   (street_name, street_number, postal_code, city) tuple; the schema's
//!   UNIQUE constraint enforces this even under concurrent writers.

use crate::model::contact::{AddressFields, AddressRecord};
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ADDRESS_SELECT_SQL: &str = "SELECT
    id,
    street_name,
    street_number,
    postal_code,
    city
FROM addresses";

/// SQLite-backed address repository.
pub struct SqliteAddressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAddressRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the row matching the full tuple, inserting it first when
    /// absent. The UNIQUE constraint makes the insert a no-op on conflict.
    pub fn find_or_create(&self, fields: &AddressFields) -> RepoResult<AddressRecord> {
        self.conn.execute(
            "INSERT OR IGNORE INTO addresses (street_name, street_number, postal_code, city)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                fields.street_name,
                fields.street_number,
                fields.postal_code,
                fields.city,
            ],
        )?;

        self.get_one(fields)?.ok_or_else(|| {
            RepoError::InvalidData("address row missing after find-or-create insert".to_string())
        })
    }
}

impl Repository for SqliteAddressRepository<'_> {
    type Record = AddressRecord;
    type Key = AddressFields;

    fn create(&self, record: &AddressRecord) -> RepoResult<AddressRecord> {
        self.conn.execute(
            "INSERT INTO addresses (street_name, street_number, postal_code, city)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                record.fields.street_name,
                record.fields.street_number,
                record.fields.postal_code,
                record.fields.city,
            ],
        )?;

        Ok(AddressRecord {
            id: self.conn.last_insert_rowid(),
            fields: record.fields.clone(),
        })
    }

    fn get_all(&self) -> RepoResult<Vec<AddressRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ADDRESS_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], parse_address_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_one(&self, key: &AddressFields) -> RepoResult<Option<AddressRecord>> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "{ADDRESS_SELECT_SQL}
                     WHERE street_name = ?1
                       AND street_number = ?2
                       AND postal_code = ?3
                       AND city = ?4;"
                ),
                params![key.street_name, key.street_number, key.postal_code, key.city],
                parse_address_row,
            )
            .optional()?;
        Ok(record)
    }

    fn update(&self, record: &AddressRecord) -> RepoResult<AddressRecord> {
        let changed = self.conn.execute(
            "UPDATE addresses
             SET street_name = ?1, street_number = ?2, postal_code = ?3, city = ?4
             WHERE id = ?5;",
            params![
                record.fields.street_name,
                record.fields.street_number,
                record.fields.postal_code,
                record.fields.city,
                record.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(record.id));
        }

        Ok(record.clone())
    }

    fn delete(&self, key: &AddressFields) -> RepoResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM addresses
             WHERE street_name = ?1
               AND street_number = ?2
               AND postal_code = ?3
               AND city = ?4;",
            params![key.street_name, key.street_number, key.postal_code, key.city],
        )?;
        Ok(removed > 0)
    }

    fn exists(&self, key: &AddressFields) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM addresses
                WHERE street_name = ?1
                  AND street_number = ?2
                  AND postal_code = ?3
                  AND city = ?4
            );",
            params![key.street_name, key.street_number, key.postal_code, key.city],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_address_row(row: &Row<'_>) -> rusqlite::Result<AddressRecord> {
    Ok(AddressRecord {
        id: row.get("id")?,
        fields: AddressFields {
            street_name: row.get("street_name")?,
            street_number: row.get("street_number")?,
            postal_code: row.get("postal_code")?,
            city: row.get("city")?,
        },
    })
}
