//! Service-level error taxonomy.
//!
//! # Responsibility
//! - Classify every failure a request can end in.
//! - Map each class to a status code and a public error envelope.
//!
//! # Invariants
//! - Internal detail (storage, hashing, encoding) is never serialized.
//! - Validation detail stays server-side; the wire only says
//!   "Validation error".

use crate::model::web::ErrorResponse;
use crate::repo::RepoError;
use crate::security::SecurityError;
use crate::validation::ValidationError;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const VALIDATION_MESSAGE: &str = "Validation error";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Unexpected failure below the service layer.
#[derive(Debug)]
pub enum InternalError {
    Repo(RepoError),
    Security(SecurityError),
    Encoding(String),
}

impl Display for InternalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Security(err) => write!(f, "{err}"),
            Self::Encoding(detail) => write!(f, "response encoding failed: {detail}"),
        }
    }
}

impl Error for InternalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Security(err) => Some(err),
            Self::Encoding(_) => None,
        }
    }
}

/// Terminal outcome of a failed request.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    Unauthorized(&'static str),
    /// Duplicate of a uniquely keyed resource.
    Conflict(&'static str),
    NotFound(&'static str),
    Internal(InternalError),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Conflict(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }

    /// Message safe to show to the caller.
    pub fn public_message(&self) -> &'static str {
        match *self {
            Self::Validation(_) => VALIDATION_MESSAGE,
            Self::Unauthorized(message) | Self::Conflict(message) | Self::NotFound(message) => {
                message
            }
            Self::Internal(_) => INTERNAL_MESSAGE,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let response = ErrorResponse::new(self.public_message());
        match self {
            Self::Unauthorized(message) | Self::Conflict(message) | Self::NotFound(message) => {
                response.with_errors(Value::String((*message).to_string()))
            }
            Self::Validation(_) | Self::Internal(_) => response,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{VALIDATION_MESSAGE}: {err}"),
            Self::Unauthorized(message) | Self::Conflict(message) | Self::NotFound(message) => {
                write!(f, "{message}")
            }
            Self::Internal(err) => write!(f, "{INTERNAL_MESSAGE}: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Internal(err) => Some(err),
            Self::Unauthorized(_) | Self::Conflict(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Internal(InternalError::Repo(value))
    }
}

impl From<SecurityError> for ServiceError {
    fn from(value: SecurityError) -> Self {
        Self::Internal(InternalError::Security(value))
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Internal(InternalError::Encoding(value.to_string()))
    }
}
