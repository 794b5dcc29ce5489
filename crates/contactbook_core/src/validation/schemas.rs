//! Per-operation schemas and their bindings to request types.

use super::{FieldRule, FieldValue, Schema, TextFormat, Validate};
use crate::model::address::{CreateAddressRequest, ListAddressRequest, UpdateAddressRequest};
use crate::model::contact::{CreateContactRequest, SearchContactRequest, UpdateContactRequest};
use crate::model::user::{LoginUserRequest, RegisterUserRequest, UpdateUserRequest};

pub const REGISTER_USER: Schema = Schema {
    name: "register_user",
    fields: &[
        FieldRule::required_text("username", 3, 20),
        FieldRule::required_text("password", 6, 20),
        FieldRule::required_text("name", 3, 50),
    ],
};

pub const LOGIN_USER: Schema = Schema {
    name: "login_user",
    fields: &[
        FieldRule::required_text("username", 3, 20),
        FieldRule::required_text("password", 6, 20),
    ],
};

pub const UPDATE_USER: Schema = Schema {
    name: "update_user",
    fields: &[
        FieldRule::optional_text("name", 3, 50),
        FieldRule::optional_text("password", 6, 20),
    ],
};

pub const CREATE_CONTACT: Schema = Schema {
    name: "create_contact",
    fields: &[
        FieldRule::required_text("first_name", 3, 50),
        FieldRule::optional_text("last_name", 3, 50),
        FieldRule::optional_text("email", 5, 50).with_format(TextFormat::Email),
        FieldRule::optional_text("phone", 10, 15).with_format(TextFormat::Phone),
    ],
};

pub const GET_CONTACT: Schema = Schema {
    name: "get_contact",
    fields: &[FieldRule::required_id("contact_id")],
};

pub const UPDATE_CONTACT: Schema = Schema {
    name: "update_contact",
    fields: &[
        FieldRule::required_id("contact_id"),
        FieldRule::required_text("first_name", 3, 50),
        FieldRule::optional_text("last_name", 3, 50),
        FieldRule::optional_text("email", 5, 50).with_format(TextFormat::Email),
        FieldRule::optional_text("phone", 10, 15).with_format(TextFormat::Phone),
    ],
};

pub const SEARCH_CONTACT: Schema = Schema {
    name: "search_contact",
    fields: &[
        FieldRule::criterion("name", 1, 50),
        FieldRule::criterion("email", 1, 50),
        FieldRule::criterion("phone", 1, 15),
        FieldRule::optional_count("page"),
        FieldRule::optional_count("limit"),
    ],
};

pub const CREATE_ADDRESS: Schema = Schema {
    name: "create_address",
    fields: &[
        FieldRule::required_id("contact_id"),
        FieldRule::optional_text("street", 3, 50),
        FieldRule::optional_text("city", 3, 50),
        FieldRule::optional_text("province", 3, 50),
        FieldRule::required_text("country", 3, 50),
        FieldRule::required_text("postal_code", 3, 50),
    ],
};

pub const GET_ADDRESS: Schema = Schema {
    name: "get_address",
    fields: &[
        FieldRule::required_id("contact_id"),
        FieldRule::required_id("address_id"),
    ],
};

pub const UPDATE_ADDRESS: Schema = Schema {
    name: "update_address",
    fields: &[
        FieldRule::required_id("contact_id"),
        FieldRule::required_id("address_id"),
        FieldRule::optional_text("street", 3, 50),
        FieldRule::optional_text("city", 3, 50),
        FieldRule::optional_text("province", 3, 50),
        FieldRule::optional_text("country", 3, 50),
        FieldRule::optional_text("postal_code", 3, 50),
    ],
};

pub const LIST_ADDRESS: Schema = Schema {
    name: "list_address",
    fields: &[
        FieldRule::required_id("contact_id"),
        FieldRule::optional_count("page"),
        FieldRule::optional_count("limit"),
    ],
};

impl Validate for RegisterUserRequest {
    const SCHEMA: Schema = REGISTER_USER;

    fn values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("username", FieldValue::Text(&self.username)),
            ("password", FieldValue::Text(&self.password)),
            ("name", FieldValue::Text(&self.name)),
        ]
    }
}

impl Validate for LoginUserRequest {
    const SCHEMA: Schema = LOGIN_USER;

    fn values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("username", FieldValue::Text(&self.username)),
            ("password", FieldValue::Text(&self.password)),
        ]
    }
}

impl Validate for UpdateUserRequest {
    const SCHEMA: Schema = UPDATE_USER;

    fn values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("name", self.name.as_deref().into()),
            ("password", self.password.as_deref().into()),
        ]
    }
}

impl Validate for CreateContactRequest {
    const SCHEMA: Schema = CREATE_CONTACT;

    fn values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("first_name", FieldValue::Text(&self.first_name)),
            ("last_name", self.last_name.as_deref().into()),
            ("email", self.email.as_deref().into()),
            ("phone", self.phone.as_deref().into()),
        ]
    }
}

/// Update payload together with the contact id it targets.
impl Validate for (i64, &UpdateContactRequest) {
    const SCHEMA: Schema = UPDATE_CONTACT;

    fn values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        let (contact_id, request) = self;
        vec![
            ("contact_id", FieldValue::Integer(*contact_id)),
            ("first_name", FieldValue::Text(&request.first_name)),
            ("last_name", request.last_name.as_deref().into()),
            ("email", request.email.as_deref().into()),
            ("phone", request.phone.as_deref().into()),
        ]
    }
}

impl Validate for SearchContactRequest {
    const SCHEMA: Schema = SEARCH_CONTACT;

    fn values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("name", self.name.as_deref().into()),
            ("email", self.email.as_deref().into()),
            ("phone", self.phone.as_deref().into()),
            ("page", FieldValue::Integer(self.page)),
            ("limit", FieldValue::Integer(self.limit)),
        ]
    }
}

impl Validate for (i64, &CreateAddressRequest) {
    const SCHEMA: Schema = CREATE_ADDRESS;

    fn values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        let (contact_id, request) = self;
        vec![
            ("contact_id", FieldValue::Integer(*contact_id)),
            ("street", request.street.as_deref().into()),
            ("city", request.city.as_deref().into()),
            ("province", request.province.as_deref().into()),
            ("country", FieldValue::Text(&request.country)),
            ("postal_code", FieldValue::Text(&request.postal_code)),
        ]
    }
}

impl Validate for (i64, i64, &UpdateAddressRequest) {
    const SCHEMA: Schema = UPDATE_ADDRESS;

    fn values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        let (contact_id, address_id, request) = self;
        vec![
            ("contact_id", FieldValue::Integer(*contact_id)),
            ("address_id", FieldValue::Integer(*address_id)),
            ("street", request.street.as_deref().into()),
            ("city", request.city.as_deref().into()),
            ("province", request.province.as_deref().into()),
            ("country", request.country.as_deref().into()),
            ("postal_code", request.postal_code.as_deref().into()),
        ]
    }
}

impl Validate for (i64, &ListAddressRequest) {
    const SCHEMA: Schema = LIST_ADDRESS;

    fn values(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        let (contact_id, request) = self;
        vec![
            ("contact_id", FieldValue::Integer(*contact_id)),
            ("page", FieldValue::Integer(request.page)),
            ("limit", FieldValue::Integer(request.limit)),
        ]
    }
}
