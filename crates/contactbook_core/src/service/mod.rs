//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, ownership checks and repository calls into
//!   request-level operations.
//! - Keep transport layers decoupled from storage details.
//!
//! # Invariants
//! - Services depend on repository and credential traits only; concrete
//!   SQLite/Argon2/UUID types are chosen by the caller.

pub mod address_service;
pub mod auth;
pub mod contact_service;
pub mod user_service;

pub use address_service::AddressService;
pub use auth::{bearer_token, AuthGuard};
pub use contact_service::ContactService;
pub use user_service::UserService;
