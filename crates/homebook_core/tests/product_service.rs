use homebook_core::db::open_db_in_memory;
use homebook_core::{ProductDto, ProductService, ProductServiceError};
use rusqlite::Connection;

fn milk() -> ProductDto {
    ProductDto {
        id: None,
        product_name: "Milk".to_string(),
        price: Some(17.5),
        store_name: "Ica".to_string(),
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn create_product_persists_and_returns_dto_with_id() {
    let mut conn = open_db_in_memory().unwrap();

    let created = ProductService::new(&mut conn).create_product(&milk()).unwrap();
    assert!(created.id.is_some());

    let loaded = ProductService::new(&mut conn)
        .get_one("Milk")
        .unwrap()
        .unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.store_name, "Ica");
}

#[test]
fn create_product_reuses_store_with_same_name() {
    let mut conn = open_db_in_memory().unwrap();

    ProductService::new(&mut conn).create_product(&milk()).unwrap();
    let bread = ProductDto {
        product_name: "Bread".to_string(),
        price: Some(32.0),
        ..milk()
    };
    ProductService::new(&mut conn).create_product(&bread).unwrap();

    assert_eq!(count(&conn, "stores"), 1);
    assert_eq!(count(&conn, "products"), 2);
}

#[test]
fn create_product_with_taken_name_fails() {
    let mut conn = open_db_in_memory().unwrap();

    ProductService::new(&mut conn).create_product(&milk()).unwrap();

    let duplicate = ProductDto {
        price: Some(99.0),
        store_name: "Coop".to_string(),
        ..milk()
    };
    let err = ProductService::new(&mut conn)
        .create_product(&duplicate)
        .unwrap_err();
    assert!(matches!(err, ProductServiceError::NameTaken(ref name) if name.as_str() == "Milk"));

    // The rejected create must not leave a Coop store behind.
    assert_eq!(count(&conn, "products"), 1);
    assert_eq!(count(&conn, "stores"), 1);
}

#[test]
fn get_one_unknown_product_is_none_not_error() {
    let mut conn = open_db_in_memory().unwrap();

    let result = ProductService::new(&mut conn).get_one("Caviar");
    assert_eq!(result.unwrap(), None);
}

#[test]
fn get_all_joins_store_names() {
    let mut conn = open_db_in_memory().unwrap();

    ProductService::new(&mut conn).create_product(&milk()).unwrap();
    let bread = ProductDto {
        product_name: "Bread".to_string(),
        store_name: "Coop".to_string(),
        ..milk()
    };
    ProductService::new(&mut conn).create_product(&bread).unwrap();

    let all = ProductService::new(&mut conn).get_all().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all
        .iter()
        .any(|p| p.product_name == "Milk" && p.store_name == "Ica"));
    assert!(all
        .iter()
        .any(|p| p.product_name == "Bread" && p.store_name == "Coop"));
}

#[test]
fn update_switches_store_and_creates_it_when_missing() {
    let mut conn = open_db_in_memory().unwrap();

    ProductService::new(&mut conn).create_product(&milk()).unwrap();

    let moved = ProductDto {
        price: Some(15.0),
        store_name: "Coop".to_string(),
        ..milk()
    };
    ProductService::new(&mut conn).update(&moved).unwrap();

    let loaded = ProductService::new(&mut conn)
        .get_one("Milk")
        .unwrap()
        .unwrap();
    assert_eq!(loaded.store_name, "Coop");
    assert_eq!(loaded.price, Some(15.0));
    // The old store is not garbage-collected on update, only on removal.
    assert_eq!(count(&conn, "stores"), 2);
}

#[test]
fn update_missing_product_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();

    let err = ProductService::new(&mut conn).update(&milk()).unwrap_err();
    assert!(matches!(err, ProductServiceError::ProductNotFound(_)));
}

#[test]
fn removing_last_product_of_a_store_deletes_the_store() {
    let mut conn = open_db_in_memory().unwrap();

    ProductService::new(&mut conn).create_product(&milk()).unwrap();
    assert_eq!(count(&conn, "stores"), 1);

    assert!(ProductService::new(&mut conn).remove("Milk").unwrap());
    assert_eq!(count(&conn, "products"), 0);
    assert_eq!(count(&conn, "stores"), 0);
}

#[test]
fn removing_product_keeps_store_still_referenced_by_another() {
    let mut conn = open_db_in_memory().unwrap();

    ProductService::new(&mut conn).create_product(&milk()).unwrap();
    let bread = ProductDto {
        product_name: "Bread".to_string(),
        ..milk()
    };
    ProductService::new(&mut conn).create_product(&bread).unwrap();

    assert!(ProductService::new(&mut conn).remove("Milk").unwrap());
    assert_eq!(count(&conn, "products"), 1);
    assert_eq!(count(&conn, "stores"), 1);

    assert!(ProductService::new(&mut conn).remove("Bread").unwrap());
    assert_eq!(count(&conn, "stores"), 0);
}

#[test]
fn remove_unknown_product_returns_false() {
    let mut conn = open_db_in_memory().unwrap();

    assert!(!ProductService::new(&mut conn).remove("Caviar").unwrap());
}
