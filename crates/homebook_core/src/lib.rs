//! Core domain logic for homebook, a console address book and shopping
//! list manager. This crate is the single source of truth for business
//! invariants; the CLI crate only renders menus over it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{
    AddressFields, AddressRecord, ContactRecord, PhoneNumberRecord, RecordId,
};
pub use model::product::{ProductRecord, StoreRecord};
pub use repo::address_repo::SqliteAddressRepository;
pub use repo::contact_repo::{ContactDetails, SqliteContactRepository};
pub use repo::phone_repo::SqlitePhoneNumberRepository;
pub use repo::product_repo::{ProductDetails, SqliteProductRepository};
pub use repo::store_repo::SqliteStoreRepository;
pub use repo::{RepoError, RepoResult, Repository};
pub use service::contact_service::{ContactDto, ContactService, ContactServiceError};
pub use service::product_service::{ProductDto, ProductService, ProductServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
