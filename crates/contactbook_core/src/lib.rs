//! Core domain logic for the contact book.
//! This crate is the single source of truth for ownership and paging
//! invariants; transports only call [`api`] or the services.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod security;
pub mod service;
pub mod validation;

pub use api::{ApiRequest, ApiResponse, ContactBookApi, Route};
pub use config::{AppConfig, ConfigError};
pub use error::{InternalError, ServiceError, ServiceResult};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use repo::{RepoError, RepoResult};
pub use security::{Argon2PasswordHasher, PasswordHasher, TokenGenerator, UuidTokenGenerator};
pub use service::{AddressService, AuthGuard, ContactService, UserService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
