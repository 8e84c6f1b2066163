//! Contact domain records.
//!
//! # Responsibility
//! - Define contact rows and the address/phone reference rows they own.
//!
//! # Invariants
//! - `email` is the contact natural key and unique in storage.
//! - Address rows are shared between contacts; equality of the full
//!   `AddressFields` tuple means the same row.

use serde::{Deserialize, Serialize};

/// Stable row identifier used across all persisted records.
pub type RecordId = i64;

/// Persisted contact row. References its address and phone number by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Rowid; zero until the record has been persisted.
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    /// Natural key, unique in storage.
    pub email: String,
    pub address_id: RecordId,
    pub phone_number_id: RecordId,
}

/// Natural-key tuple for address deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub street_name: String,
    pub street_number: String,
    pub postal_code: String,
    pub city: String,
}

/// Persisted address row, shared by any number of contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub id: RecordId,
    pub fields: AddressFields,
}

/// Persisted phone number row. The number itself is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumberRecord {
    pub id: RecordId,
    pub number: String,
}
