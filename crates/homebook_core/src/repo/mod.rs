//! Repository layer: generic data-access contract and SQLite implementations.
//!
//! # Responsibility
//! - Define one CRUD contract shared by every entity repository.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Reads report absence as `Ok(None)` / `false`, never as an error, so
//!   callers can always tell "not found" from a storage fault.
//! - `update` on a missing row is `RepoError::NotFound`.
//! - Reference repositories never insert a duplicate natural key; the
//!   UNIQUE constraints in the schema back this up.

use crate::db::DbError;
use crate::model::contact::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod address_repo;
pub mod contact_repo;
pub mod phone_repo;
pub mod product_repo;
pub mod store_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(RecordId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: id={id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// CRUD contract implemented by every entity repository.
///
/// `Key` is the entity's natural key (an email, a product name, the full
/// address tuple), not its rowid: callers of the service layer address
/// records the same way the console user does.
pub trait Repository {
    /// Persisted row shape.
    type Record;
    /// Natural key used by lookups and deletes.
    type Key: ?Sized;

    /// Inserts one record and returns it with its assigned id.
    fn create(&self, record: &Self::Record) -> RepoResult<Self::Record>;
    /// Returns all rows.
    fn get_all(&self) -> RepoResult<Vec<Self::Record>>;
    /// Returns the row matching the natural key, if any.
    fn get_one(&self, key: &Self::Key) -> RepoResult<Option<Self::Record>>;
    /// Re-saves a record located by its id.
    fn update(&self, record: &Self::Record) -> RepoResult<Self::Record>;
    /// Deletes by natural key. Returns whether a matching row existed.
    fn delete(&self, key: &Self::Key) -> RepoResult<bool>;
    /// Returns whether a row with the natural key exists.
    fn exists(&self, key: &Self::Key) -> RepoResult<bool>;
}
