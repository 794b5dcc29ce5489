#![allow(dead_code)]

use contactbook_core::model::user::{RegisterUserRequest, User};
use contactbook_core::repo::SqliteUserRepository;
use contactbook_core::security::{PasswordHasher, SecurityError, TokenGenerator};
use contactbook_core::UserService;
use rusqlite::Connection;
use std::cell::Cell;

/// Reversible stand-in for Argon2 so service tests stay fast.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, SecurityError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, SecurityError> {
        match digest.strip_prefix("plain$") {
            Some(stored) => Ok(stored == password),
            None => Err(SecurityError::MalformedDigest(digest.to_string())),
        }
    }
}

/// Deterministic tokens: `token-1`, `token-2`, ...
#[derive(Default)]
pub struct SequentialTokens {
    issued: Cell<u32>,
}

impl TokenGenerator for SequentialTokens {
    fn new_token(&self) -> String {
        let next = self.issued.get() + 1;
        self.issued.set(next);
        format!("token-{next}")
    }
}

pub fn user_service(
    conn: &Connection,
) -> UserService<SqliteUserRepository<'_>, PlainHasher, SequentialTokens> {
    UserService::new(
        SqliteUserRepository::try_new(conn).unwrap(),
        PlainHasher,
        SequentialTokens::default(),
    )
}

pub fn register_request(username: &str, password: &str, name: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        username: username.to_string(),
        password: password.to_string(),
        name: name.to_string(),
    }
}

/// Registers `username` and returns the stored row as the acting identity.
pub fn registered_user(conn: &Connection, username: &str) -> User {
    user_service(conn)
        .register(register_request(username, "secret123", "Test User"))
        .unwrap();
    User {
        username: username.to_string(),
        name: "Test User".to_string(),
        password: "plain$secret123".to_string(),
        token: None,
    }
}
