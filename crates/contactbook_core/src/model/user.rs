//! User entity, requests and response shape.
//!
//! # Invariants
//! - `username` is the globally unique identity key.
//! - `password` always holds a digest, never plaintext.
//! - `token` is `None` until login and after logout.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Storage field names for the `users` collection.
pub mod fields {
    pub const USERNAME: &str = "username";
    pub const NAME: &str = "name";
    pub const PASSWORD: &str = "password";
    pub const TOKEN: &str = "token";
}

/// Stored user record; also the acting identity after authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub name: String,
    /// PHC-formatted password digest.
    pub password: String,
    pub token: Option<String>,
}

impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Insert shape for a freshly registered user. No token is issued yet.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub password_digest: String,
}

/// Partial update for a user row. `None` leaves the column untouched.
///
/// `token: Some(None)` clears the session token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password_digest: Option<String>,
    pub token: Option<Option<String>>,
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    pub name: String,
}

impl Debug for RegisterUserRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUserRequest")
            .field("username", &self.username)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginUserRequest {
    pub username: String,
    pub password: String,
}

impl Debug for LoginUserRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginUserRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Profile patch. Omitted fields keep their stored values.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Shaped user response. `token` is only present right after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl UserResponse {
    /// Shapes a user together with its freshly issued session token.
    pub fn with_token(user: &User) -> Self {
        Self {
            token: user.token.clone(),
            ..Self::from(user)
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            name: user.name.clone(),
            token: None,
        }
    }
}
