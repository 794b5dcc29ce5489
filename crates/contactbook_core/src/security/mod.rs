//! Credential primitives used by the user service and the auth guard.
//!
//! # Responsibility
//! - Hash and verify passwords without exposing the algorithm to callers.
//! - Issue opaque session tokens.
//!
//! # Invariants
//! - Plaintext passwords never leave [`PasswordHasher::hash`] or
//!   [`PasswordHasher::verify`].
//! - Issued tokens are unique per call.

mod password;
mod token;

pub use password::Argon2PasswordHasher;
pub use token::UuidTokenGenerator;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure inside a credential primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// Digest could not be produced.
    HashFailed(String),
    /// Stored digest is not in a recognized format.
    MalformedDigest(String),
}

impl Display for SecurityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HashFailed(detail) => write!(f, "password hashing failed: {detail}"),
            Self::MalformedDigest(detail) => {
                write!(f, "stored password digest is malformed: {detail}")
            }
        }
    }
}

impl Error for SecurityError {}

/// One-way password digest.
pub trait PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, SecurityError>;
    /// Returns `Ok(false)` for a well-formed digest that does not match.
    fn verify(&self, password: &str, digest: &str) -> Result<bool, SecurityError>;
}

/// Source of fresh session tokens.
pub trait TokenGenerator {
    fn new_token(&self) -> String;
}

impl<T: PasswordHasher + ?Sized> PasswordHasher for &T {
    fn hash(&self, password: &str) -> Result<String, SecurityError> {
        (**self).hash(password)
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, SecurityError> {
        (**self).verify(password, digest)
    }
}

impl<T: TokenGenerator + ?Sized> TokenGenerator for &T {
    fn new_token(&self) -> String {
        (**self).new_token()
    }
}
