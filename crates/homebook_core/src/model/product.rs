//! Shopping-list domain records.
//!
//! # Invariants
//! - `ProductRecord::name` is the product natural key and unique in storage.
//! - `StoreRecord::name` is unique; store rows are garbage-collected once no
//!   product references them.

use crate::model::contact::RecordId;
use serde::{Deserialize, Serialize};

/// Persisted product row. References its store by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Rowid; zero until the record has been persisted.
    pub id: RecordId,
    /// Natural key, unique in storage.
    pub name: String,
    pub price: Option<f64>,
    pub store_id: RecordId,
}

/// Persisted store row, shared by any number of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: RecordId,
    pub name: String,
}
