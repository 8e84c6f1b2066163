use homebook_core::db::open_db_in_memory;
use homebook_core::{
    AddressFields, AddressRecord, ContactRecord, PhoneNumberRecord, ProductRecord, RepoError,
    Repository, SqliteAddressRepository, SqliteContactRepository, SqlitePhoneNumberRepository,
    SqliteProductRepository, SqliteStoreRepository, StoreRecord,
};

fn sample_address() -> AddressFields {
    AddressFields {
        street_name: "Gustaf Dalensgatan".to_string(),
        street_number: "24".to_string(),
        postal_code: "41724".to_string(),
        city: "Goteborg".to_string(),
    }
}

#[test]
fn address_create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAddressRepository::new(&conn);

    let created = repo
        .create(&AddressRecord {
            id: 0,
            fields: sample_address(),
        })
        .unwrap();
    assert!(created.id > 0);

    let loaded = repo.get_one(&sample_address()).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert!(repo.exists(&sample_address()).unwrap());
}

#[test]
fn address_get_one_missing_is_none_not_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAddressRepository::new(&conn);

    assert_eq!(repo.get_one(&sample_address()).unwrap(), None);
    assert!(!repo.exists(&sample_address()).unwrap());
}

#[test]
fn address_find_or_create_reuses_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAddressRepository::new(&conn);

    let first = repo.find_or_create(&sample_address()).unwrap();
    let second = repo.find_or_create(&sample_address()).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(repo.get_all().unwrap().len(), 1);
}

#[test]
fn phone_find_or_create_dedups_by_number() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhoneNumberRepository::new(&conn);

    let first = repo.find_or_create("0793555635").unwrap();
    let second = repo.find_or_create("0793555635").unwrap();
    let other = repo.find_or_create("0793555634").unwrap();

    assert_eq!(first.id, second.id);
    assert_ne!(first.id, other.id);
    assert_eq!(repo.get_all().unwrap().len(), 2);
}

#[test]
fn store_find_or_create_and_delete_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::new(&conn);

    let store = repo.find_or_create("Ica").unwrap();
    assert_eq!(repo.find_or_create("Ica").unwrap().id, store.id);

    assert!(repo.delete_by_id(store.id).unwrap());
    assert!(!repo.delete_by_id(store.id).unwrap());
    assert_eq!(repo.get_one("Ica").unwrap(), None);
}

#[test]
fn update_missing_row_returns_not_found() {
    let conn = open_db_in_memory().unwrap();

    let err = SqliteStoreRepository::new(&conn)
        .update(&StoreRecord {
            id: 42,
            name: "Nowhere".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));

    let err = SqlitePhoneNumberRepository::new(&conn)
        .update(&PhoneNumberRecord {
            id: 7,
            number: "0000".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(7)));
}

#[test]
fn contact_crud_by_email() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&conn);
    let phones = SqlitePhoneNumberRepository::new(&conn);
    let contacts = SqliteContactRepository::new(&conn);

    let address = addresses.find_or_create(&sample_address()).unwrap();
    let phone = phones.find_or_create("0793555635").unwrap();

    let created = contacts
        .create(&ContactRecord {
            id: 0,
            first_name: "Anna".to_string(),
            last_name: "Ozmehak".to_string(),
            email: "anna@example.com".to_string(),
            address_id: address.id,
            phone_number_id: phone.id,
        })
        .unwrap();
    assert!(created.id > 0);

    let mut renamed = contacts.get_one("anna@example.com").unwrap().unwrap();
    assert_eq!(renamed, created);
    renamed.last_name = "Svensson".to_string();
    contacts.update(&renamed).unwrap();
    assert_eq!(
        contacts.get_one_by_id(created.id).unwrap().unwrap().last_name,
        "Svensson"
    );

    assert!(contacts.delete("anna@example.com").unwrap());
    assert!(!contacts.delete("anna@example.com").unwrap());
    assert_eq!(contacts.get_one("anna@example.com").unwrap(), None);
}

#[test]
fn contact_detailed_reads_join_address_and_phone() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&conn);
    let phones = SqlitePhoneNumberRepository::new(&conn);
    let contacts = SqliteContactRepository::new(&conn);

    let address = addresses.find_or_create(&sample_address()).unwrap();
    let phone = phones.find_or_create("0793555635").unwrap();
    contacts
        .create(&ContactRecord {
            id: 0,
            first_name: "Anna".to_string(),
            last_name: "Ozmehak".to_string(),
            email: "anna@example.com".to_string(),
            address_id: address.id,
            phone_number_id: phone.id,
        })
        .unwrap();

    let details = contacts.get_one_detailed("anna@example.com").unwrap().unwrap();
    assert_eq!(details.address.fields, sample_address());
    assert_eq!(details.phone_number.number, "0793555635");

    let all = contacts.get_all_detailed().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], details);
}

#[test]
fn product_crud_and_store_in_use() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStoreRepository::new(&conn);
    let products = SqliteProductRepository::new(&conn);

    let store = stores.find_or_create("Ica").unwrap();
    assert!(!products.store_in_use(store.id).unwrap());

    let created = products
        .create(&ProductRecord {
            id: 0,
            name: "Milk".to_string(),
            price: Some(17.5),
            store_id: store.id,
        })
        .unwrap();
    assert!(products.store_in_use(store.id).unwrap());

    let details = products.get_one_detailed("Milk").unwrap().unwrap();
    assert_eq!(details.product, created);
    assert_eq!(details.store.name, "Ica");

    assert!(products.delete("Milk").unwrap());
    assert!(!products.store_in_use(store.id).unwrap());
    assert_eq!(products.get_one("Milk").unwrap(), None);
}
