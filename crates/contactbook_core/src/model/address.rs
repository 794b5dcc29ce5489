//! Address entity, requests and response shape.
//!
//! # Invariants
//! - Every address belongs to exactly one contact (`contact_id`).
//! - Updates are patches; see [`AddressChanges`].

use super::contact::ContactId;
use serde::{Deserialize, Serialize};

/// Store-assigned address identifier.
pub type AddressId = i64;

/// Storage field names for the `addresses` collection.
pub mod fields {
    pub const ID: &str = "id";
    pub const CONTACT_ID: &str = "contact_id";
    pub const STREET: &str = "street";
    pub const CITY: &str = "city";
    pub const PROVINCE: &str = "province";
    pub const COUNTRY: &str = "country";
    pub const POSTAL_CODE: &str = "postal_code";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: AddressId,
    pub contact_id: ContactId,
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub contact_id: ContactId,
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: String,
    pub postal_code: String,
}

/// Patch over an address row. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressChanges {
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateAddressRequest {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    pub country: String,
    pub postal_code: String,
}

impl CreateAddressRequest {
    pub fn new(country: impl Into<String>, postal_code: impl Into<String>) -> Self {
        Self {
            street: None,
            city: None,
            province: None,
            country: country.into(),
            postal_code: postal_code.into(),
        }
    }

    pub(crate) fn into_draft(self, contact_id: ContactId) -> NewAddress {
        NewAddress {
            contact_id,
            street: self.street,
            city: self.city,
            province: self.province,
            country: self.country,
            postal_code: self.postal_code,
        }
    }
}

/// Patch payload; every field is optional, including all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateAddressRequest {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl From<UpdateAddressRequest> for AddressChanges {
    fn from(value: UpdateAddressRequest) -> Self {
        Self {
            street: value.street,
            city: value.city,
            province: value.province,
            country: value.country,
            postal_code: value.postal_code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListAddressRequest {
    #[serde(default = "super::web::default_page")]
    pub page: i64,
    #[serde(default = "super::web::default_limit")]
    pub limit: i64,
}

impl Default for ListAddressRequest {
    fn default() -> Self {
        Self {
            page: super::web::default_page(),
            limit: super::web::default_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: String,
}

impl From<&Address> for AddressResponse {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id,
            street: address.street.clone().unwrap_or_default(),
            city: address.city.clone().unwrap_or_default(),
            province: address.province.clone().unwrap_or_default(),
            country: address.country.clone(),
            postal_code: address.postal_code.clone(),
        }
    }
}
