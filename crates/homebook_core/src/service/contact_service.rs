//! Contact use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/remove APIs keyed by contact email.
//! - Resolve shared address and phone rows via find-or-create before the
//!   contact row is written.
//!
//! # Invariants
//! - Create refuses an email that is already taken.
//! - Create and update commit all of their row writes in one transaction.
//! - Update re-points the contact at a freshly resolved address row; the
//!   previously referenced address row is left in place even when nothing
//!   references it anymore. Contact removal never cleans up address or
//!   phone rows either.

use crate::model::contact::{AddressFields, ContactRecord, RecordId};
use crate::repo::address_repo::SqliteAddressRepository;
use crate::repo::contact_repo::{ContactDetails, SqliteContactRepository};
use crate::repo::phone_repo::SqlitePhoneNumberRepository;
use crate::repo::{RepoError, RepoResult, Repository};
use log::info;
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Menu-facing contact shape: scalar fields plus the flattened address
/// tuple and phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDto {
    /// Populated on records read back from storage.
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub street_name: String,
    pub street_number: String,
    pub postal_code: String,
    pub city: String,
}

impl ContactDto {
    fn address_fields(&self) -> AddressFields {
        AddressFields {
            street_name: self.street_name.clone(),
            street_number: self.street_number.clone(),
            postal_code: self.postal_code.clone(),
            city: self.city.clone(),
        }
    }
}

impl From<ContactDetails> for ContactDto {
    fn from(details: ContactDetails) -> Self {
        Self {
            id: Some(details.contact.id),
            first_name: details.contact.first_name,
            last_name: details.contact.last_name,
            email: details.contact.email,
            phone_number: details.phone_number.number,
            street_name: details.address.fields.street_name,
            street_number: details.address.fields.street_number,
            postal_code: details.address.fields.postal_code,
            city: details.address.fields.city,
        }
    }
}

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ContactServiceError {
    /// A contact with this email already exists.
    EmailTaken(String),
    /// Target contact does not exist.
    ContactNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ContactServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailTaken(email) => write!(f, "contact email already taken: {email}"),
            Self::ContactNotFound(key) => write!(f, "contact not found: {key}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContactServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ContactServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for ContactServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Contact service over one migrated connection.
pub struct ContactService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> ContactService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Creates one contact, reusing matching address and phone rows.
    ///
    /// Fails with [`ContactServiceError::EmailTaken`] when a contact with
    /// the same email exists. All row writes commit atomically.
    pub fn create_contact(&mut self, dto: &ContactDto) -> Result<ContactDto, ContactServiceError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let created = {
            let contacts = SqliteContactRepository::new(&tx);
            if contacts.exists(dto.email.as_str())? {
                return Err(ContactServiceError::EmailTaken(dto.email.clone()));
            }

            let address = SqliteAddressRepository::new(&tx).find_or_create(&dto.address_fields())?;
            let phone =
                SqlitePhoneNumberRepository::new(&tx).find_or_create(dto.phone_number.as_str())?;

            contacts.create(&ContactRecord {
                id: 0,
                first_name: dto.first_name.clone(),
                last_name: dto.last_name.clone(),
                email: dto.email.clone(),
                address_id: address.id,
                phone_number_id: phone.id,
            })?
        };
        tx.commit()?;

        info!(
            "event=contact_create module=service status=ok contact_id={}",
            created.id
        );
        Ok(ContactDto {
            id: Some(created.id),
            ..dto.clone()
        })
    }

    /// Gets one contact by email with its address and phone eager-loaded.
    pub fn get_one(&self, email: &str) -> RepoResult<Option<ContactDto>> {
        let details = SqliteContactRepository::new(self.conn).get_one_detailed(email)?;
        Ok(details.map(ContactDto::from))
    }

    /// Lists all contacts with addresses and phones eager-loaded.
    pub fn get_all(&self) -> RepoResult<Vec<ContactDto>> {
        let details = SqliteContactRepository::new(self.conn).get_all_detailed()?;
        Ok(details.into_iter().map(ContactDto::from).collect())
    }

    /// Updates an existing contact, located by id when the DTO carries one
    /// and by email otherwise.
    ///
    /// Address and phone references are re-resolved exactly as in create.
    /// A previously referenced address row is never deleted, even when the
    /// update leaves it unreferenced.
    pub fn update(&mut self, dto: &ContactDto) -> Result<ContactDto, ContactServiceError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let updated = {
            let contacts = SqliteContactRepository::new(&tx);
            let existing = match dto.id {
                Some(id) => contacts.get_one_by_id(id)?,
                None => contacts.get_one(dto.email.as_str())?,
            };
            let existing = existing.ok_or_else(|| {
                ContactServiceError::ContactNotFound(match dto.id {
                    Some(id) => format!("id={id}"),
                    None => dto.email.clone(),
                })
            })?;

            let address = SqliteAddressRepository::new(&tx).find_or_create(&dto.address_fields())?;
            let phone =
                SqlitePhoneNumberRepository::new(&tx).find_or_create(dto.phone_number.as_str())?;

            contacts.update(&ContactRecord {
                id: existing.id,
                first_name: dto.first_name.clone(),
                last_name: dto.last_name.clone(),
                email: dto.email.clone(),
                address_id: address.id,
                phone_number_id: phone.id,
            })?
        };
        tx.commit()?;

        info!(
            "event=contact_update module=service status=ok contact_id={}",
            updated.id
        );
        Ok(ContactDto {
            id: Some(updated.id),
            ..dto.clone()
        })
    }

    /// Removes one contact by email. Returns whether a row existed.
    ///
    /// The referenced address and phone rows stay behind; only product
    /// removal garbage-collects its reference row.
    pub fn remove(&mut self, email: &str) -> RepoResult<bool> {
        let removed = SqliteContactRepository::new(self.conn).delete(email)?;
        if removed {
            info!("event=contact_remove module=service status=ok");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::ContactDto;
    use crate::model::contact::{AddressFields, AddressRecord, ContactRecord, PhoneNumberRecord};
    use crate::repo::contact_repo::ContactDetails;

    fn sample_details() -> ContactDetails {
        ContactDetails {
            contact: ContactRecord {
                id: 7,
                first_name: "Anna".to_string(),
                last_name: "Ozmehak".to_string(),
                email: "anna@example.com".to_string(),
                address_id: 3,
                phone_number_id: 4,
            },
            address: AddressRecord {
                id: 3,
                fields: AddressFields {
                    street_name: "Gustaf Dalensgatan".to_string(),
                    street_number: "24".to_string(),
                    postal_code: "41724".to_string(),
                    city: "Goteborg".to_string(),
                },
            },
            phone_number: PhoneNumberRecord {
                id: 4,
                number: "0793555635".to_string(),
            },
        }
    }

    #[test]
    fn dto_from_details_flattens_address_and_phone() {
        let dto = ContactDto::from(sample_details());
        assert_eq!(dto.id, Some(7));
        assert_eq!(dto.email, "anna@example.com");
        assert_eq!(dto.phone_number, "0793555635");
        assert_eq!(dto.street_name, "Gustaf Dalensgatan");
        assert_eq!(dto.city, "Goteborg");
    }

    #[test]
    fn dto_serializes_with_flat_field_names() {
        let dto = ContactDto::from(sample_details());
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["street_number"], "24");
        assert_eq!(json["postal_code"], "41724");
    }
}
