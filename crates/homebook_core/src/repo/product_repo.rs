//! Product repository: CRUD by product name plus store-joined reads.
//!
//! # Responsibility
//! - Provide product persistence keyed by the product name natural key.
//! - Answer whether a store id is still referenced, for the orphaned-store
//!   sweep on product removal.

use crate::model::contact::RecordId;
use crate::model::product::{ProductRecord, StoreRecord};
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    price,
    store_id
FROM products";

const PRODUCT_DETAIL_SELECT_SQL: &str = "SELECT
    p.id,
    p.name,
    p.price,
    p.store_id,
    s.name AS store_name
FROM products p
INNER JOIN stores s ON s.id = p.store_id";

/// Product read model with its store eager-loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub product: ProductRecord,
    pub store: StoreRecord,
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns one product with its store joined in.
    pub fn get_one_detailed(&self, name: &str) -> RepoResult<Option<ProductDetails>> {
        let details = self
            .conn
            .query_row(
                &format!("{PRODUCT_DETAIL_SELECT_SQL} WHERE p.name = ?1;"),
                [name],
                parse_product_detail_row,
            )
            .optional()?;
        Ok(details)
    }

    /// Returns all products with stores joined in.
    pub fn get_all_detailed(&self) -> RepoResult<Vec<ProductDetails>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_DETAIL_SELECT_SQL} ORDER BY p.id ASC;"))?;
        let rows = stmt.query_map([], parse_product_detail_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Returns one bare product row by id.
    pub fn get_one_by_id(&self, id: RecordId) -> RepoResult<Option<ProductRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_product_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Returns whether any product still references the given store id.
    pub fn store_in_use(&self, store_id: RecordId) -> RepoResult<bool> {
        let in_use: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM products WHERE store_id = ?1);",
            [store_id],
            |row| row.get(0),
        )?;
        Ok(in_use == 1)
    }
}

impl Repository for SqliteProductRepository<'_> {
    type Record = ProductRecord;
    type Key = str;

    fn create(&self, record: &ProductRecord) -> RepoResult<ProductRecord> {
        self.conn.execute(
            "INSERT INTO products (name, price, store_id) VALUES (?1, ?2, ?3);",
            params![record.name, record.price, record.store_id],
        )?;

        Ok(ProductRecord {
            id: self.conn.last_insert_rowid(),
            ..record.clone()
        })
    }

    fn get_all(&self) -> RepoResult<Vec<ProductRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], parse_product_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_one(&self, key: &str) -> RepoResult<Option<ProductRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("{PRODUCT_SELECT_SQL} WHERE name = ?1;"),
                [key],
                parse_product_row,
            )
            .optional()?;
        Ok(record)
    }

    fn update(&self, record: &ProductRecord) -> RepoResult<ProductRecord> {
        let changed = self.conn.execute(
            "UPDATE products SET name = ?1, price = ?2, store_id = ?3 WHERE id = ?4;",
            params![record.name, record.price, record.store_id, record.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(record.id));
        }

        Ok(record.clone())
    }

    fn delete(&self, key: &str) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM products WHERE name = ?1;", [key])?;
        Ok(removed > 0)
    }

    fn exists(&self, key: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM products WHERE name = ?1);",
            [key],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_product_row(row: &Row<'_>) -> rusqlite::Result<ProductRecord> {
    Ok(ProductRecord {
        id: row.get("id")?,
        name: row.get("name")?,
        price: row.get("price")?,
        store_id: row.get("store_id")?,
    })
}

fn parse_product_detail_row(row: &Row<'_>) -> rusqlite::Result<ProductDetails> {
    Ok(ProductDetails {
        product: ProductRecord {
            id: row.get("id")?,
            name: row.get("name")?,
            price: row.get("price")?,
            store_id: row.get("store_id")?,
        },
        store: StoreRecord {
            id: row.get("store_id")?,
            name: row.get("store_name")?,
        },
    })
}
