//! Console menu over homebook_core.
//!
//! # Responsibility
//! - Present the numbered menu, collect free-text field values, and invoke
//!   the contact/product services.
//! - Keep all business behavior inside the core crate; this binary only
//!   reads lines and prints results.

use homebook_core::db::open_db;
use homebook_core::{
    ContactDto, ContactService, ContactServiceError, ProductDto, ProductService,
    ProductServiceError,
};
use log::warn;
use rusqlite::Connection;
use std::io::{self, BufRead, Write};

const DB_PATH_ENV: &str = "HOMEBOOK_DB";
const LOG_DIR_ENV: &str = "HOMEBOOK_LOG_DIR";
const DEFAULT_DB_PATH: &str = "homebook.db";

fn main() {
    if let Some(log_dir) = std::env::var_os(LOG_DIR_ENV) {
        let log_dir = log_dir.to_string_lossy().into_owned();
        if let Err(err) = homebook_core::init_logging(homebook_core::default_log_level(), &log_dir)
        {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    let mut conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open database `{db_path}`: {err}");
            std::process::exit(1);
        }
    };

    println!("----- AddressBook & ShoppingList -----");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!();
        println!("What do you want to do?");
        println!(" 1. Add a new contact");
        println!(" 2. Show all contacts");
        println!(" 3. Show one contact");
        println!(" 4. Update a contact");
        println!(" 5. Delete a contact");
        println!(" 6. Add a product to the shopping list");
        println!(" 7. Show the shopping list");
        println!(" 8. Show one product");
        println!(" 9. Update a product");
        println!("10. Delete a product");
        println!("11. Close the application");

        let Some(option) = prompt(&mut lines, "Choose an option") else {
            break;
        };

        let result = match option.as_str() {
            "1" => add_contact(&mut conn, &mut lines),
            "2" => show_all_contacts(&mut conn),
            "3" => show_one_contact(&mut conn, &mut lines),
            "4" => update_contact(&mut conn, &mut lines),
            "5" => delete_contact(&mut conn, &mut lines),
            "6" => add_product(&mut conn, &mut lines),
            "7" => show_shopping_list(&mut conn),
            "8" => show_one_product(&mut conn, &mut lines),
            "9" => update_product(&mut conn, &mut lines),
            "10" => delete_product(&mut conn, &mut lines),
            "11" => break,
            other => {
                println!("Unknown option: {other}");
                Ok(())
            }
        };

        if let Err(message) = result {
            warn!("event=menu_action module=cli status=error error={message}");
            println!("{message}");
        }
    }
}

type Lines<'a> = io::Lines<io::StdinLock<'a>>;

fn prompt(lines: &mut Lines<'_>, label: &str) -> Option<String> {
    print!("{label}: ");
    let _ = io::stdout().flush();
    match lines.next() {
        Some(Ok(line)) => Some(line.trim().to_string()),
        _ => None,
    }
}

fn read_contact_fields(lines: &mut Lines<'_>) -> Option<ContactDto> {
    Some(ContactDto {
        id: None,
        first_name: prompt(lines, "FirstName")?,
        last_name: prompt(lines, "LastName")?,
        email: prompt(lines, "Email")?,
        phone_number: prompt(lines, "PhoneNumber")?,
        street_name: prompt(lines, "StreetName")?,
        street_number: prompt(lines, "StreetNumber")?,
        postal_code: prompt(lines, "PostalCode")?,
        city: prompt(lines, "City")?,
    })
}

fn read_product_fields(lines: &mut Lines<'_>) -> Option<ProductDto> {
    let product_name = prompt(lines, "Name")?;
    let price_text = prompt(lines, "Price (blank for none)")?;
    let price = if price_text.is_empty() {
        None
    } else {
        match price_text.parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                println!("Not a valid price: {price_text}");
                return None;
            }
        }
    };
    Some(ProductDto {
        id: None,
        product_name,
        price,
        store_name: prompt(lines, "Store")?,
    })
}

fn add_contact(conn: &mut Connection, lines: &mut Lines<'_>) -> Result<(), String> {
    println!("Add Contact");
    println!("-------------");
    let Some(dto) = read_contact_fields(lines) else {
        return Ok(());
    };

    match ContactService::new(conn).create_contact(&dto) {
        Ok(created) => {
            println!("Contact saved: {} {}", created.first_name, created.last_name);
            Ok(())
        }
        Err(ContactServiceError::EmailTaken(email)) => {
            Err(format!("A contact with email {email} already exists"))
        }
        Err(err) => Err(err.to_string()),
    }
}

fn show_all_contacts(conn: &mut Connection) -> Result<(), String> {
    let contacts = ContactService::new(conn)
        .get_all()
        .map_err(|err| err.to_string())?;

    println!("All contacts");
    println!("--------------");
    if contacts.is_empty() {
        println!("No contacts found");
        return Ok(());
    }

    for contact in contacts {
        print_contact(&contact);
        println!();
    }
    Ok(())
}

fn show_one_contact(conn: &mut Connection, lines: &mut Lines<'_>) -> Result<(), String> {
    let Some(email) = prompt(lines, "Email of the contact") else {
        return Ok(());
    };

    match ContactService::new(conn)
        .get_one(&email)
        .map_err(|err| err.to_string())?
    {
        Some(contact) => {
            print_contact(&contact);
            Ok(())
        }
        None => Err(format!("Can't find a contact with email {email}")),
    }
}

fn update_contact(conn: &mut Connection, lines: &mut Lines<'_>) -> Result<(), String> {
    println!("Update Contact (located by email, fields are replaced)");
    println!("-------------");
    let Some(dto) = read_contact_fields(lines) else {
        return Ok(());
    };

    match ContactService::new(conn).update(&dto) {
        Ok(updated) => {
            println!("Contact updated: {}", updated.email);
            Ok(())
        }
        Err(ContactServiceError::ContactNotFound(key)) => {
            Err(format!("Can't find a contact: {key}"))
        }
        Err(err) => Err(err.to_string()),
    }
}

fn delete_contact(conn: &mut Connection, lines: &mut Lines<'_>) -> Result<(), String> {
    let Some(email) = prompt(lines, "Email of the contact to delete") else {
        return Ok(());
    };

    let removed = ContactService::new(conn)
        .remove(&email)
        .map_err(|err| err.to_string())?;
    if removed {
        println!("Contact deleted");
        Ok(())
    } else {
        Err(format!("Can't find a contact with email {email}"))
    }
}

fn add_product(conn: &mut Connection, lines: &mut Lines<'_>) -> Result<(), String> {
    println!("Add Product to shopping list");
    println!("-------------");
    let Some(dto) = read_product_fields(lines) else {
        return Ok(());
    };

    match ProductService::new(conn).create_product(&dto) {
        Ok(created) => {
            println!("Product saved: {}", created.product_name);
            Ok(())
        }
        Err(ProductServiceError::NameTaken(name)) => {
            Err(format!("A product named {name} already exists"))
        }
        Err(err) => Err(err.to_string()),
    }
}

fn show_shopping_list(conn: &mut Connection) -> Result<(), String> {
    let products = ProductService::new(conn)
        .get_all()
        .map_err(|err| err.to_string())?;

    println!("Shopping list");
    println!("--------------");
    if products.is_empty() {
        println!("No products found");
        return Ok(());
    }

    for product in products {
        print_product(&product);
    }
    Ok(())
}

fn show_one_product(conn: &mut Connection, lines: &mut Lines<'_>) -> Result<(), String> {
    let Some(name) = prompt(lines, "Name of the product") else {
        return Ok(());
    };

    match ProductService::new(conn)
        .get_one(&name)
        .map_err(|err| err.to_string())?
    {
        Some(product) => {
            print_product(&product);
            Ok(())
        }
        None => Err(format!("Can't find a product named {name}")),
    }
}

fn update_product(conn: &mut Connection, lines: &mut Lines<'_>) -> Result<(), String> {
    println!("Update Product (located by name, fields are replaced)");
    println!("-------------");
    let Some(dto) = read_product_fields(lines) else {
        return Ok(());
    };

    match ProductService::new(conn).update(&dto) {
        Ok(updated) => {
            println!("Product updated: {}", updated.product_name);
            Ok(())
        }
        Err(ProductServiceError::ProductNotFound(key)) => {
            Err(format!("Can't find a product: {key}"))
        }
        Err(err) => Err(err.to_string()),
    }
}

fn delete_product(conn: &mut Connection, lines: &mut Lines<'_>) -> Result<(), String> {
    let Some(name) = prompt(lines, "Name of the product to delete") else {
        return Ok(());
    };

    let removed = ProductService::new(conn)
        .remove(&name)
        .map_err(|err| err.to_string())?;
    if removed {
        println!("Product deleted");
        Ok(())
    } else {
        Err(format!("Can't find a product named {name}"))
    }
}

fn print_contact(contact: &ContactDto) {
    println!("Name: {} {}", contact.first_name, contact.last_name);
    println!("Email: {}", contact.email);
    println!("Phone number: {}", contact.phone_number);
    println!(
        "Address: {} {}, {} {}",
        contact.street_name, contact.street_number, contact.postal_code, contact.city
    );
}

fn print_product(product: &ProductDto) {
    match product.price {
        Some(price) => println!(
            "{} ({price}) at {}",
            product.product_name, product.store_name
        ),
        None => println!("{} at {}", product.product_name, product.store_name),
    }
}
