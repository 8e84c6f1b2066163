//! Product use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/remove APIs keyed by product name.
//! - Resolve shared store rows via find-or-create before the product row
//!   is written.
//!
//! # Invariants
//! - Create refuses a product name that is already taken.
//! - Removing the last product referencing a store deletes that store in
//!   the same transaction. A store still referenced by another product is
//!   left intact.

use crate::model::contact::RecordId;
use crate::model::product::ProductRecord;
use crate::repo::product_repo::{ProductDetails, SqliteProductRepository};
use crate::repo::store_repo::SqliteStoreRepository;
use crate::repo::{RepoError, RepoResult, Repository};
use log::info;
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Menu-facing product shape carrying the store name instead of its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    /// Populated on records read back from storage.
    pub id: Option<RecordId>,
    pub product_name: String,
    pub price: Option<f64>,
    pub store_name: String,
}

impl From<ProductDetails> for ProductDto {
    fn from(details: ProductDetails) -> Self {
        Self {
            id: Some(details.product.id),
            product_name: details.product.name,
            price: details.product.price,
            store_name: details.store.name,
        }
    }
}

/// Service error for product use-cases.
#[derive(Debug)]
pub enum ProductServiceError {
    /// A product with this name already exists.
    NameTaken(String),
    /// Target product does not exist.
    ProductNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ProductServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameTaken(name) => write!(f, "product name already taken: {name}"),
            Self::ProductNotFound(key) => write!(f, "product not found: {key}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProductServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProductServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for ProductServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Product service over one migrated connection.
pub struct ProductService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> ProductService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Creates one product, reusing a matching store row.
    ///
    /// Fails with [`ProductServiceError::NameTaken`] when a product with
    /// the same name exists. All row writes commit atomically.
    pub fn create_product(&mut self, dto: &ProductDto) -> Result<ProductDto, ProductServiceError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let created = {
            let products = SqliteProductRepository::new(&tx);
            if products.exists(dto.product_name.as_str())? {
                return Err(ProductServiceError::NameTaken(dto.product_name.clone()));
            }

            let store = SqliteStoreRepository::new(&tx).find_or_create(dto.store_name.as_str())?;

            products.create(&ProductRecord {
                id: 0,
                name: dto.product_name.clone(),
                price: dto.price,
                store_id: store.id,
            })?
        };
        tx.commit()?;

        info!(
            "event=product_create module=service status=ok product_id={}",
            created.id
        );
        Ok(ProductDto {
            id: Some(created.id),
            ..dto.clone()
        })
    }

    /// Gets one product by name with its store eager-loaded.
    pub fn get_one(&self, product_name: &str) -> RepoResult<Option<ProductDto>> {
        let details = SqliteProductRepository::new(self.conn).get_one_detailed(product_name)?;
        Ok(details.map(ProductDto::from))
    }

    /// Lists all products with stores eager-loaded.
    pub fn get_all(&self) -> RepoResult<Vec<ProductDto>> {
        let details = SqliteProductRepository::new(self.conn).get_all_detailed()?;
        Ok(details.into_iter().map(ProductDto::from).collect())
    }

    /// Updates an existing product, located by id when the DTO carries one
    /// and by name otherwise. The store reference is re-resolved by the new
    /// store name; no store garbage collection happens on update.
    pub fn update(&mut self, dto: &ProductDto) -> Result<ProductDto, ProductServiceError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let updated = {
            let products = SqliteProductRepository::new(&tx);
            let existing = match dto.id {
                Some(id) => products.get_one_by_id(id)?,
                None => products.get_one(dto.product_name.as_str())?,
            };
            let existing = existing.ok_or_else(|| {
                ProductServiceError::ProductNotFound(match dto.id {
                    Some(id) => format!("id={id}"),
                    None => dto.product_name.clone(),
                })
            })?;

            let store = SqliteStoreRepository::new(&tx).find_or_create(dto.store_name.as_str())?;

            products.update(&ProductRecord {
                id: existing.id,
                name: dto.product_name.clone(),
                price: dto.price,
                store_id: store.id,
            })?
        };
        tx.commit()?;

        info!(
            "event=product_update module=service status=ok product_id={}",
            updated.id
        );
        Ok(ProductDto {
            id: Some(updated.id),
            ..dto.clone()
        })
    }

    /// Removes one product by name. Returns whether a row existed.
    ///
    /// When no remaining product references the removed product's store,
    /// the store row is deleted in the same transaction.
    pub fn remove(&mut self, product_name: &str) -> RepoResult<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = {
            let products = SqliteProductRepository::new(&tx);
            match products.get_one(product_name)? {
                None => false,
                Some(product) => {
                    products.delete(product_name)?;
                    if !products.store_in_use(product.store_id)? {
                        SqliteStoreRepository::new(&tx).delete_by_id(product.store_id)?;
                        info!(
                            "event=store_sweep module=service status=ok store_id={}",
                            product.store_id
                        );
                    }
                    true
                }
            }
        };
        tx.commit()?;

        if removed {
            info!("event=product_remove module=service status=ok");
        }
        Ok(removed)
    }
}
