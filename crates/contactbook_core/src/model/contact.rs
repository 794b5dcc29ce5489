//! Contact entity, requests and response shape.
//!
//! # Invariants
//! - Every contact is owned by exactly one user (`username`).
//! - Updates replace every mutable field; see [`ContactChanges`].

use serde::{Deserialize, Serialize};

/// Store-assigned contact identifier.
pub type ContactId = i64;

/// Storage field names for the `contacts` collection.
pub mod fields {
    pub const COLLECTION: &str = "contacts";
    pub const ID: &str = "id";
    pub const USERNAME: &str = "username";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    /// Owning user.
    pub username: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub username: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Full replacement of a contact's mutable fields. `None` clears a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactChanges {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateContactRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CreateContactRequest {
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: None,
            email: None,
            phone: None,
        }
    }

    pub(crate) fn into_draft(self, username: &str) -> NewContact {
        NewContact {
            username: username.to_string(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
        }
    }
}

/// Replacement payload; `first_name` is always required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateContactRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<UpdateContactRequest> for ContactChanges {
    fn from(value: UpdateContactRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
        }
    }
}

/// Search criteria plus paging window. Blank criteria are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "super::web::default_page")]
    pub page: i64,
    #[serde(default = "super::web::default_limit")]
    pub limit: i64,
}

impl Default for SearchContactRequest {
    fn default() -> Self {
        Self {
            name: None,
            email: None,
            phone: None,
            page: super::web::default_page(),
            limit: super::web::default_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<&Contact> for ContactResponse {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone().unwrap_or_default(),
            email: contact.email.clone().unwrap_or_default(),
            phone: contact.phone.clone().unwrap_or_default(),
        }
    }
}
