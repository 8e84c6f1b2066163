//! Use-case services for the console menu.
//!
//! # Responsibility
//! - Orchestrate repository calls into contact/product use-case APIs.
//! - Map persisted records to the DTO shapes the menu layer consumes.
//!
//! # Invariants
//! - Every multi-entity write runs inside one IMMEDIATE transaction, so a
//!   failure mid-sequence cannot leave orphaned reference rows behind.
//! - Reference rows are deduplicated by natural key before the owning
//!   entity is written.

pub mod contact_service;
pub mod product_service;
