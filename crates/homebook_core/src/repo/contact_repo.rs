//! Contact repository: CRUD by email plus eager-loaded detail reads.
//!
//! # Responsibility
//! - Provide contact persistence keyed by the email natural key.
//! - Join address and phone rows into one read model for the service layer.
//!
//! # Invariants
//! - `get_one_detailed`/`get_all_detailed` always carry the full address
//!   and phone number; a contact row with a dangling reference is invalid
//!   persisted data, not a silent `None`.

use crate::model::contact::{AddressFields, AddressRecord, ContactRecord, PhoneNumberRecord};
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    address_id,
    phone_number_id
FROM contacts";

const CONTACT_DETAIL_SELECT_SQL: &str = "SELECT
    c.id,
    c.first_name,
    c.last_name,
    c.email,
    a.id AS address_id,
    a.street_name,
    a.street_number,
    a.postal_code,
    a.city,
    p.id AS phone_number_id,
    p.number
FROM contacts c
INNER JOIN addresses a ON a.id = c.address_id
INNER JOIN phone_numbers p ON p.id = c.phone_number_id";

/// Contact read model with its address and phone number eager-loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub contact: ContactRecord,
    pub address: AddressRecord,
    pub phone_number: PhoneNumberRecord,
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns one contact with address and phone joined in.
    pub fn get_one_detailed(&self, email: &str) -> RepoResult<Option<ContactDetails>> {
        let details = self
            .conn
            .query_row(
                &format!("{CONTACT_DETAIL_SELECT_SQL} WHERE c.email = ?1;"),
                [email],
                parse_contact_detail_row,
            )
            .optional()?;
        Ok(details)
    }

    /// Returns all contacts with addresses and phones joined in.
    pub fn get_all_detailed(&self) -> RepoResult<Vec<ContactDetails>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_DETAIL_SELECT_SQL} ORDER BY c.id ASC;"))?;
        let rows = stmt.query_map([], parse_contact_detail_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Returns one bare contact row by id.
    pub fn get_one_by_id(&self, id: i64) -> RepoResult<Option<ContactRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_contact_row,
            )
            .optional()?;
        Ok(record)
    }
}

impl Repository for SqliteContactRepository<'_> {
    type Record = ContactRecord;
    type Key = str;

    fn create(&self, record: &ContactRecord) -> RepoResult<ContactRecord> {
        self.conn.execute(
            "INSERT INTO contacts (first_name, last_name, email, address_id, phone_number_id)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.first_name,
                record.last_name,
                record.email,
                record.address_id,
                record.phone_number_id,
            ],
        )?;

        Ok(ContactRecord {
            id: self.conn.last_insert_rowid(),
            ..record.clone()
        })
    }

    fn get_all(&self) -> RepoResult<Vec<ContactRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], parse_contact_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_one(&self, key: &str) -> RepoResult<Option<ContactRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("{CONTACT_SELECT_SQL} WHERE email = ?1;"),
                [key],
                parse_contact_row,
            )
            .optional()?;
        Ok(record)
    }

    fn update(&self, record: &ContactRecord) -> RepoResult<ContactRecord> {
        let changed = self.conn.execute(
            "UPDATE contacts
             SET first_name = ?1,
                 last_name = ?2,
                 email = ?3,
                 address_id = ?4,
                 phone_number_id = ?5
             WHERE id = ?6;",
            params![
                record.first_name,
                record.last_name,
                record.email,
                record.address_id,
                record.phone_number_id,
                record.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(record.id));
        }

        Ok(record.clone())
    }

    fn delete(&self, key: &str) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM contacts WHERE email = ?1;", [key])?;
        Ok(removed > 0)
    }

    fn exists(&self, key: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM contacts WHERE email = ?1);",
            [key],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_contact_row(row: &Row<'_>) -> rusqlite::Result<ContactRecord> {
    Ok(ContactRecord {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        address_id: row.get("address_id")?,
        phone_number_id: row.get("phone_number_id")?,
    })
}

fn parse_contact_detail_row(row: &Row<'_>) -> rusqlite::Result<ContactDetails> {
    Ok(ContactDetails {
        contact: ContactRecord {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            address_id: row.get("address_id")?,
            phone_number_id: row.get("phone_number_id")?,
        },
        address: AddressRecord {
            id: row.get("address_id")?,
            fields: AddressFields {
                street_name: row.get("street_name")?,
                street_number: row.get("street_number")?,
                postal_code: row.get("postal_code")?,
                city: row.get("city")?,
            },
        },
        phone_number: PhoneNumberRecord {
            id: row.get("phone_number_id")?,
            number: row.get("number")?,
        },
    })
}
