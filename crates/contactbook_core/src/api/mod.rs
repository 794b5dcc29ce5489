//! Transport-agnostic request dispatcher.
//!
//! # Responsibility
//! - Map one route plus bearer value, path ids and JSON body onto the
//!   guard, validation and service pipeline.
//! - Render every outcome as a success or error envelope.
//!
//! # Invariants
//! - `handle` never panics and never returns a bare error.
//! - Authenticated routes resolve the acting user before reading the body.
//! - Path ids override ids of the same name inside the body.

use crate::error::{ServiceError, ServiceResult, INTERNAL_MESSAGE};
use crate::model::address::{
    CreateAddressRequest, ListAddressRequest, UpdateAddressRequest,
};
use crate::model::contact::{CreateContactRequest, SearchContactRequest, UpdateContactRequest};
use crate::model::user::{LoginUserRequest, RegisterUserRequest, UpdateUserRequest, User};
use crate::model::web::{PagedResult, WebResponse};
use crate::repo::{SqliteAddressRepository, SqliteContactRepository, SqliteUserRepository};
use crate::security::{PasswordHasher, TokenGenerator};
use crate::service::{AddressService, AuthGuard, ContactService, UserService};
use crate::validation::{schemas, Schema, ValidationError};
use log::{error, info, warn};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::time::Instant;

const CONTACT_ID_FIELD: &str = "contact_id";
const ADDRESS_ID_FIELD: &str = "address_id";

/// Every operation reachable through the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    RegisterUser,
    LoginUser,
    CurrentUser,
    UpdateCurrentUser,
    LogoutUser,
    CreateContact,
    GetContact,
    UpdateContact,
    DeleteContact,
    SearchContacts,
    CreateAddress,
    GetAddress,
    UpdateAddress,
    DeleteAddress,
    ListAddresses,
}

impl Route {
    pub const ALL: [Route; 15] = [
        Route::RegisterUser,
        Route::LoginUser,
        Route::CurrentUser,
        Route::UpdateCurrentUser,
        Route::LogoutUser,
        Route::CreateContact,
        Route::GetContact,
        Route::UpdateContact,
        Route::DeleteContact,
        Route::SearchContacts,
        Route::CreateAddress,
        Route::GetAddress,
        Route::UpdateAddress,
        Route::DeleteAddress,
        Route::ListAddresses,
    ];

    /// Stable kebab-case name, e.g. `search-contacts`.
    pub fn name(self) -> &'static str {
        match self {
            Self::RegisterUser => "register-user",
            Self::LoginUser => "login-user",
            Self::CurrentUser => "current-user",
            Self::UpdateCurrentUser => "update-current-user",
            Self::LogoutUser => "logout-user",
            Self::CreateContact => "create-contact",
            Self::GetContact => "get-contact",
            Self::UpdateContact => "update-contact",
            Self::DeleteContact => "delete-contact",
            Self::SearchContacts => "search-contacts",
            Self::CreateAddress => "create-address",
            Self::GetAddress => "get-address",
            Self::UpdateAddress => "update-address",
            Self::DeleteAddress => "delete-address",
            Self::ListAddresses => "list-addresses",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|route| route.name().eq_ignore_ascii_case(name))
    }

    pub fn requires_auth(self) -> bool {
        !matches!(self, Self::RegisterUser | Self::LoginUser)
    }

    fn success_status(self) -> u16 {
        match self {
            Self::CreateAddress => 201,
            _ => 200,
        }
    }
}

/// One inbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub route: Route,
    /// Raw `Authorization` header value.
    pub authorization: Option<String>,
    pub contact_id: Option<i64>,
    pub address_id: Option<i64>,
    pub body: Value,
}

impl ApiRequest {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            authorization: None,
            contact_id: None,
            address_id: None,
            body: Value::Null,
        }
    }

    /// Sets `Authorization: Bearer <token>`.
    pub fn with_token(mut self, token: &str) -> Self {
        self.authorization = Some(format!("Bearer {token}"));
        self
    }

    pub fn with_authorization(mut self, header: impl Into<String>) -> Self {
        self.authorization = Some(header.into());
        self
    }

    pub fn with_contact(mut self, contact_id: i64) -> Self {
        self.contact_id = Some(contact_id);
        self
    }

    pub fn with_address(mut self, address_id: i64) -> Self {
        self.address_id = Some(address_id);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }
}

/// Status code plus the serialized envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Request pipeline over one SQLite connection.
pub struct ContactBookApi<'conn, H: PasswordHasher, G: TokenGenerator> {
    conn: &'conn Connection,
    hasher: H,
    tokens: G,
}

impl<'conn, H: PasswordHasher, G: TokenGenerator> ContactBookApi<'conn, H, G> {
    pub fn new(conn: &'conn Connection, hasher: H, tokens: G) -> Self {
        Self {
            conn,
            hasher,
            tokens,
        }
    }

    /// Runs `request` through the pipeline and renders the envelope.
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let started_at = Instant::now();
        let route = request.route;

        let outcome = self.dispatch(request).map(|body| ApiResponse {
            status_code: route.success_status(),
            body,
        });

        match outcome {
            Ok(response) => {
                info!(
                    "event=api_request module=api status=ok route={} session={} code={} duration_ms={}",
                    route.name(),
                    route.requires_auth(),
                    response.status_code,
                    started_at.elapsed().as_millis()
                );
                response
            }
            Err(err) => {
                let status_code = err.status_code();
                if status_code >= 500 {
                    error!(
                        "event=api_request module=api status=error route={} code={status_code} duration_ms={} error={err}",
                        route.name(),
                        started_at.elapsed().as_millis()
                    );
                } else {
                    warn!(
                        "event=api_request module=api status=error route={} code={status_code} duration_ms={} error={err}",
                        route.name(),
                        started_at.elapsed().as_millis()
                    );
                }
                ApiResponse {
                    status_code,
                    body: error_body(&err),
                }
            }
        }
    }

    /// Routes one request. Every arm except register and login resolves the
    /// session first.
    fn dispatch(&self, request: &ApiRequest) -> ServiceResult<Value> {
        match request.route {
            Route::RegisterUser => {
                let body = parse::<RegisterUserRequest>(&schemas::REGISTER_USER, &request.body)?;
                success("User registered successfully", self.user_service()?.register(body)?)
            }
            Route::LoginUser => {
                let body = parse::<LoginUserRequest>(&schemas::LOGIN_USER, &request.body)?;
                success("User logged in successfully", self.user_service()?.login(body)?)
            }
            Route::CurrentUser => {
                let user = &self.authenticate(request)?;
                success("User retrieved successfully", self.user_service()?.profile(user))
            }
            Route::UpdateCurrentUser => {
                let user = &self.authenticate(request)?;
                let body = parse::<UpdateUserRequest>(&schemas::UPDATE_USER, &request.body)?;
                success("User updated successfully", self.user_service()?.update(user, body)?)
            }
            Route::LogoutUser => {
                let user = &self.authenticate(request)?;
                self.user_service()?.logout(user)?;
                success("User logged out successfully", true)
            }
            Route::CreateContact => {
                let user = &self.authenticate(request)?;
                let body =
                    parse::<CreateContactRequest>(&schemas::CREATE_CONTACT, &request.body)?;
                success(
                    "Contact created successfully",
                    self.contact_service()?.create(user, body)?,
                )
            }
            Route::GetContact => {
                let user = &self.authenticate(request)?;
                let contact_id = path_id(request.contact_id, CONTACT_ID_FIELD)?;
                success(
                    "Contact retrieved successfully",
                    self.contact_service()?.get(user, contact_id)?,
                )
            }
            Route::UpdateContact => {
                let user = &self.authenticate(request)?;
                let contact_id = path_id(request.contact_id, CONTACT_ID_FIELD)?;
                let body = with_path_ids(&request.body, &[(CONTACT_ID_FIELD, contact_id)]);
                let body = parse::<UpdateContactRequest>(&schemas::UPDATE_CONTACT, &body)?;
                success(
                    "Contact updated successfully",
                    self.contact_service()?.update(user, contact_id, body)?,
                )
            }
            Route::DeleteContact => {
                let user = &self.authenticate(request)?;
                let contact_id = path_id(request.contact_id, CONTACT_ID_FIELD)?;
                self.contact_service()?.delete(user, contact_id)?;
                success("Contact deleted successfully", true)
            }
            Route::SearchContacts => {
                let user = &self.authenticate(request)?;
                let body = parse::<SearchContactRequest>(
                    &schemas::SEARCH_CONTACT,
                    &object_or_empty(&request.body),
                )?;
                paged(
                    "Contacts retrieved successfully",
                    self.contact_service()?.search(user, &body)?,
                )
            }
            Route::CreateAddress => {
                let user = &self.authenticate(request)?;
                let contact_id = path_id(request.contact_id, CONTACT_ID_FIELD)?;
                let body = with_path_ids(&request.body, &[(CONTACT_ID_FIELD, contact_id)]);
                let body = parse::<CreateAddressRequest>(&schemas::CREATE_ADDRESS, &body)?;
                success(
                    "Address created successfully",
                    self.address_service()?.create(user, contact_id, body)?,
                )
            }
            Route::GetAddress => {
                let user = &self.authenticate(request)?;
                let contact_id = path_id(request.contact_id, CONTACT_ID_FIELD)?;
                let address_id = path_id(request.address_id, ADDRESS_ID_FIELD)?;
                success(
                    "Address retrieved successfully",
                    self.address_service()?.get(user, contact_id, address_id)?,
                )
            }
            Route::UpdateAddress => {
                let user = &self.authenticate(request)?;
                let contact_id = path_id(request.contact_id, CONTACT_ID_FIELD)?;
                let address_id = path_id(request.address_id, ADDRESS_ID_FIELD)?;
                let body = with_path_ids(
                    &request.body,
                    &[(CONTACT_ID_FIELD, contact_id), (ADDRESS_ID_FIELD, address_id)],
                );
                let body = parse::<UpdateAddressRequest>(&schemas::UPDATE_ADDRESS, &body)?;
                success(
                    "Address updated successfully",
                    self.address_service()?
                        .update(user, contact_id, address_id, body)?,
                )
            }
            Route::DeleteAddress => {
                let user = &self.authenticate(request)?;
                let contact_id = path_id(request.contact_id, CONTACT_ID_FIELD)?;
                let address_id = path_id(request.address_id, ADDRESS_ID_FIELD)?;
                self.address_service()?
                    .delete(user, contact_id, address_id)?;
                success("Address deleted successfully", true)
            }
            Route::ListAddresses => {
                let user = &self.authenticate(request)?;
                let contact_id = path_id(request.contact_id, CONTACT_ID_FIELD)?;
                let body = with_path_ids(
                    &object_or_empty(&request.body),
                    &[(CONTACT_ID_FIELD, contact_id)],
                );
                let body = parse::<ListAddressRequest>(&schemas::LIST_ADDRESS, &body)?;
                paged(
                    "Address list retrieved successfully",
                    self.address_service()?.list(user, contact_id, &body)?,
                )
            }
        }
    }

    fn authenticate(&self, request: &ApiRequest) -> ServiceResult<User> {
        AuthGuard::new(SqliteUserRepository::try_new(self.conn)?)
            .authenticate(request.authorization.as_deref())
    }

    fn user_service(&self) -> ServiceResult<UserService<SqliteUserRepository<'conn>, &H, &G>> {
        Ok(UserService::new(
            SqliteUserRepository::try_new(self.conn)?,
            &self.hasher,
            &self.tokens,
        ))
    }

    fn contact_service(&self) -> ServiceResult<ContactService<SqliteContactRepository<'conn>>> {
        Ok(ContactService::new(SqliteContactRepository::try_new(
            self.conn,
        )?))
    }

    fn address_service(
        &self,
    ) -> ServiceResult<AddressService<SqliteContactRepository<'conn>, SqliteAddressRepository<'conn>>>
    {
        Ok(AddressService::new(
            SqliteContactRepository::try_new(self.conn)?,
            SqliteAddressRepository::try_new(self.conn)?,
        ))
    }
}

fn parse<T: DeserializeOwned>(schema: &Schema, body: &Value) -> ServiceResult<T> {
    Ok(schema.parse::<T>(body)?)
}

fn path_id(value: Option<i64>, field: &'static str) -> ServiceResult<i64> {
    value.ok_or(ServiceError::Validation(ValidationError::MissingField { field }))
}

/// Copies path ids into an object body so one schema covers both.
fn with_path_ids(body: &Value, ids: &[(&str, i64)]) -> Value {
    let mut body = body.clone();
    if let Value::Object(map) = &mut body {
        for (field, id) in ids {
            map.insert((*field).to_string(), Value::from(*id));
        }
    }
    body
}

fn object_or_empty(body: &Value) -> Value {
    match body {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    }
}

fn success<T: Serialize>(message: &str, data: T) -> ServiceResult<Value> {
    Ok(serde_json::to_value(WebResponse::success(message, data))?)
}

fn paged<T: Serialize>(message: &str, page: PagedResult<T>) -> ServiceResult<Value> {
    Ok(serde_json::to_value(WebResponse::paged(message, page))?)
}

fn error_body(err: &ServiceError) -> Value {
    serde_json::to_value(err.to_response())
        .unwrap_or_else(|_| json!({ "status": "error", "message": INTERNAL_MESSAGE }))
}
