//! Persisted record shapes for the address book and shopping list.
//!
//! # Responsibility
//! - Define the canonical row structs mapped by the repository layer.
//! - Name the natural key of every deduplicated reference row.
//!
//! # Invariants
//! - Every record is identified by a stable SQLite rowid (`id`).
//! - Reference rows (address, phone number, store) are unique per natural
//!   key at the storage layer.

pub mod contact;
pub mod product;
