//! Address use-cases behind the user → contact → address chain.
//!
//! # Responsibility
//! - Create, read, patch, delete and list addresses of an owned contact.
//!
//! # Invariants
//! - Hop 1 confirms the contact belongs to the acting user before any
//!   address is touched.
//! - Hop 2 filters re-assert the whole chain inside the acting statement,
//!   so a contact deleted or re-owned in between cannot leak or mutate rows.

use super::contact_service::{owned_contact, CONTACT_NOT_FOUND_MESSAGE};
use crate::error::{ServiceError, ServiceResult};
use crate::logging::sanitize_for_log;
use crate::model::address::{
    fields, AddressId, AddressResponse, CreateAddressRequest, ListAddressRequest,
    UpdateAddressRequest,
};
use crate::model::contact::{self, ContactId};
use crate::model::user::User;
use crate::model::web::PagedResult;
use crate::query::{Pagination, Predicate};
use crate::repo::{AddressRepository, ContactRepository, RepoError};
use crate::validation::schemas::GET_ADDRESS;
use crate::validation::{FieldValue, Validate};
use log::{debug, info, warn};

pub const ADDRESS_NOT_FOUND_MESSAGE: &str = "Address not found";

/// Filter matching addresses of `contact_id` only while `username` owns it.
pub fn owned_addresses(username: &str, contact_id: ContactId) -> Predicate {
    Predicate::and([
        Predicate::eq(fields::CONTACT_ID, contact_id),
        Predicate::in_select(
            fields::CONTACT_ID,
            contact::fields::COLLECTION,
            contact::fields::ID,
            Predicate::eq(contact::fields::USERNAME, username),
        ),
    ])
}

/// Filter matching one address through the full ownership chain.
pub fn owned_address(username: &str, contact_id: ContactId, address_id: AddressId) -> Predicate {
    Predicate::eq(fields::ID, address_id).and_also(owned_addresses(username, contact_id))
}

pub struct AddressService<C: ContactRepository, A: AddressRepository> {
    contacts: C,
    addresses: A,
}

impl<C: ContactRepository, A: AddressRepository> AddressService<C, A> {
    pub fn new(contacts: C, addresses: A) -> Self {
        Self {
            contacts,
            addresses,
        }
    }

    pub fn create(
        &self,
        user: &User,
        contact_id: ContactId,
        request: CreateAddressRequest,
    ) -> ServiceResult<AddressResponse> {
        (contact_id, &request).validate()?;
        self.ensure_contact(user, contact_id)?;

        let address = match self.addresses.create(&request.into_draft(contact_id)) {
            Ok(address) => address,
            Err(RepoError::MissingParent(_)) => {
                warn!(
                    "event=address_create module=service status=error username={} contact_id={contact_id} reason=contact_vanished",
                    sanitize_for_log(&user.username)
                );
                return Err(ServiceError::NotFound(CONTACT_NOT_FOUND_MESSAGE));
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            "event=address_create module=service status=ok username={} contact_id={contact_id} address_id={}",
            sanitize_for_log(&user.username),
            address.id
        );
        Ok(AddressResponse::from(&address))
    }

    pub fn get(
        &self,
        user: &User,
        contact_id: ContactId,
        address_id: AddressId,
    ) -> ServiceResult<AddressResponse> {
        check_address_ids(contact_id, address_id)?;
        self.ensure_contact(user, contact_id)?;

        let address = self
            .addresses
            .find_one(&owned_address(&user.username, contact_id, address_id))?
            .ok_or(ServiceError::NotFound(ADDRESS_NOT_FOUND_MESSAGE))?;
        Ok(AddressResponse::from(&address))
    }

    /// Patches the present fields. An empty patch returns the stored row.
    pub fn update(
        &self,
        user: &User,
        contact_id: ContactId,
        address_id: AddressId,
        request: UpdateAddressRequest,
    ) -> ServiceResult<AddressResponse> {
        (contact_id, address_id, &request).validate()?;
        self.ensure_contact(user, contact_id)?;

        let address = self
            .addresses
            .update(
                &owned_address(&user.username, contact_id, address_id),
                &request.into(),
            )?
            .ok_or(ServiceError::NotFound(ADDRESS_NOT_FOUND_MESSAGE))?;

        info!(
            "event=address_update module=service status=ok username={} contact_id={contact_id} address_id={address_id}",
            sanitize_for_log(&user.username)
        );
        Ok(AddressResponse::from(&address))
    }

    pub fn delete(
        &self,
        user: &User,
        contact_id: ContactId,
        address_id: AddressId,
    ) -> ServiceResult<()> {
        check_address_ids(contact_id, address_id)?;
        self.ensure_contact(user, contact_id)?;

        self.addresses
            .delete(&owned_address(&user.username, contact_id, address_id))?
            .ok_or(ServiceError::NotFound(ADDRESS_NOT_FOUND_MESSAGE))?;

        info!(
            "event=address_delete module=service status=ok username={} contact_id={contact_id} address_id={address_id}",
            sanitize_for_log(&user.username)
        );
        Ok(())
    }

    pub fn list(
        &self,
        user: &User,
        contact_id: ContactId,
        request: &ListAddressRequest,
    ) -> ServiceResult<PagedResult<AddressResponse>> {
        (contact_id, request).validate()?;
        let pagination = Pagination::try_new(request.page, request.limit)?;
        self.ensure_contact(user, contact_id)?;

        let filter = owned_addresses(&user.username, contact_id);
        let total = self.addresses.count(&filter)?;
        let addresses = self.addresses.find_many(&filter, pagination.window())?;

        debug!(
            "event=address_list module=service status=ok username={} contact_id={contact_id} total={total} returned={}",
            sanitize_for_log(&user.username),
            addresses.len()
        );
        Ok(PagedResult {
            data: addresses.iter().map(AddressResponse::from).collect(),
            paging: pagination.paging(total),
        })
    }

    fn ensure_contact(&self, user: &User, contact_id: ContactId) -> ServiceResult<()> {
        let owned = self
            .contacts
            .count(&owned_contact(&user.username, contact_id))?;
        if owned == 0 {
            debug!(
                "event=address_scope module=service status=error username={} contact_id={contact_id}",
                sanitize_for_log(&user.username)
            );
            return Err(ServiceError::NotFound(CONTACT_NOT_FOUND_MESSAGE));
        }
        Ok(())
    }
}

fn check_address_ids(contact_id: ContactId, address_id: AddressId) -> ServiceResult<()> {
    GET_ADDRESS.check(&[
        ("contact_id", FieldValue::Integer(contact_id)),
        ("address_id", FieldValue::Integer(address_id)),
    ])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::owned_address;
    use crate::query::Predicate;

    #[test]
    fn address_filter_reasserts_the_whole_chain() {
        let filter = owned_address("alice", 7, 3);

        assert_eq!(
            filter,
            Predicate::And(vec![
                Predicate::eq("id", 3_i64),
                Predicate::and([
                    Predicate::eq("contact_id", 7_i64),
                    Predicate::in_select(
                        "contact_id",
                        "contacts",
                        "id",
                        Predicate::eq("username", "alice"),
                    ),
                ]),
            ])
        );
    }
}
