//! Authentication guard.
//!
//! # Responsibility
//! - Resolve an `Authorization` header value to the acting [`User`].
//!
//! # Invariants
//! - Read-only: the guard never mutates users or tokens.
//! - Every failure is reported as the same `Unauthorized` outcome.

use crate::error::{ServiceError, ServiceResult};
use crate::model::user::{fields, User};
use crate::query::Predicate;
use crate::repo::UserRepository;
use log::{debug, warn};

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
const BEARER_SCHEME: &str = "bearer";

/// Extracts the credential from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively; a missing, blank or
/// differently-schemed value yields `None`.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves session tokens to users.
pub struct AuthGuard<R: UserRepository> {
    users: R,
}

impl<R: UserRepository> AuthGuard<R> {
    pub fn new(users: R) -> Self {
        Self { users }
    }

    /// Returns the user whose stored token equals the presented one.
    pub fn authenticate(&self, header: Option<&str>) -> ServiceResult<User> {
        let Some(token) = bearer_token(header) else {
            debug!("event=auth_check module=service status=error reason=missing_credential");
            return Err(ServiceError::Unauthorized(UNAUTHORIZED_MESSAGE));
        };

        match self.users.find_one(&Predicate::eq(fields::TOKEN, token))? {
            Some(user) => {
                debug!("event=auth_check module=service status=ok");
                Ok(user)
            }
            None => {
                warn!("event=auth_check module=service status=error reason=unknown_token");
                Err(ServiceError::Unauthorized(UNAUTHORIZED_MESSAGE))
            }
        }
    }
}
