//! Contact use-cases scoped to the acting user.
//!
//! # Responsibility
//! - Create, read, replace, delete and search a user's contacts.
//!
//! # Invariants
//! - Every read and mutation carries the owner filter in the same
//!   statement, so a foreign contact is indistinguishable from a missing one.
//! - Search results are ordered by id and never exceed `limit` items.

use crate::error::{ServiceError, ServiceResult};
use crate::logging::sanitize_for_log;
use crate::model::contact::{
    fields, ContactId, ContactResponse, CreateContactRequest, SearchContactRequest,
    UpdateContactRequest,
};
use crate::model::user::User;
use crate::model::web::PagedResult;
use crate::query::{Pagination, Predicate};
use crate::repo::ContactRepository;
use crate::validation::schemas::GET_CONTACT;
use crate::validation::{FieldValue, Validate};
use log::{debug, info};

pub const CONTACT_NOT_FOUND_MESSAGE: &str = "Contact not found";

/// Filter matching `contact_id` only when `username` owns it.
pub fn owned_contact(username: &str, contact_id: ContactId) -> Predicate {
    Predicate::and([
        Predicate::eq(fields::ID, contact_id),
        Predicate::eq(fields::USERNAME, username),
    ])
}

pub struct ContactService<R: ContactRepository> {
    contacts: R,
}

impl<R: ContactRepository> ContactService<R> {
    pub fn new(contacts: R) -> Self {
        Self { contacts }
    }

    pub fn create(
        &self,
        user: &User,
        request: CreateContactRequest,
    ) -> ServiceResult<ContactResponse> {
        request.validate()?;
        let contact = self.contacts.create(&request.into_draft(&user.username))?;

        info!(
            "event=contact_create module=service status=ok username={} contact_id={}",
            sanitize_for_log(&user.username),
            contact.id
        );
        Ok(ContactResponse::from(&contact))
    }

    pub fn get(&self, user: &User, contact_id: ContactId) -> ServiceResult<ContactResponse> {
        check_contact_id(contact_id)?;
        let contact = self
            .contacts
            .find_one(&owned_contact(&user.username, contact_id))?
            .ok_or(ServiceError::NotFound(CONTACT_NOT_FOUND_MESSAGE))?;
        Ok(ContactResponse::from(&contact))
    }

    /// Replaces every mutable field; absent optionals are cleared.
    pub fn update(
        &self,
        user: &User,
        contact_id: ContactId,
        request: UpdateContactRequest,
    ) -> ServiceResult<ContactResponse> {
        (contact_id, &request).validate()?;
        let contact = self
            .contacts
            .update(&owned_contact(&user.username, contact_id), &request.into())?
            .ok_or(ServiceError::NotFound(CONTACT_NOT_FOUND_MESSAGE))?;

        info!(
            "event=contact_update module=service status=ok username={} contact_id={contact_id}",
            sanitize_for_log(&user.username)
        );
        Ok(ContactResponse::from(&contact))
    }

    /// Deletes the contact together with its addresses.
    pub fn delete(&self, user: &User, contact_id: ContactId) -> ServiceResult<()> {
        check_contact_id(contact_id)?;
        self.contacts
            .delete(&owned_contact(&user.username, contact_id))?
            .ok_or(ServiceError::NotFound(CONTACT_NOT_FOUND_MESSAGE))?;

        info!(
            "event=contact_delete module=service status=ok username={} contact_id={contact_id}",
            sanitize_for_log(&user.username)
        );
        Ok(())
    }

    pub fn search(
        &self,
        user: &User,
        request: &SearchContactRequest,
    ) -> ServiceResult<PagedResult<ContactResponse>> {
        request.validate()?;
        let pagination = Pagination::try_new(request.page, request.limit)?;
        let filter = search_filter(&user.username, request);

        let total = self.contacts.count(&filter)?;
        let contacts = self.contacts.find_many(&filter, pagination.window())?;

        debug!(
            "event=contact_search module=service status=ok username={} page={} limit={} total={total} returned={}",
            sanitize_for_log(&user.username),
            pagination.page(),
            pagination.limit(),
            contacts.len()
        );
        Ok(PagedResult {
            data: contacts.iter().map(ContactResponse::from).collect(),
            paging: pagination.paging(total),
        })
    }
}

fn check_contact_id(contact_id: ContactId) -> ServiceResult<()> {
    GET_CONTACT.check(&[("contact_id", FieldValue::Integer(contact_id))])?;
    Ok(())
}

fn search_filter(username: &str, request: &SearchContactRequest) -> Predicate {
    let mut filter = Predicate::and([Predicate::eq(fields::USERNAME, username)]);
    if let Some(name) = criterion(&request.name) {
        filter = filter.and_also(Predicate::or([
            Predicate::contains_insensitive(fields::FIRST_NAME, name),
            Predicate::contains_insensitive(fields::LAST_NAME, name),
        ]));
    }
    if let Some(email) = criterion(&request.email) {
        filter = filter.and_also(Predicate::contains_insensitive(fields::EMAIL, email));
    }
    if let Some(phone) = criterion(&request.phone) {
        filter = filter.and_also(Predicate::contains_insensitive(fields::PHONE, phone));
    }
    filter
}

fn criterion(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}
