//! Domain model for the contact book.
//!
//! # Responsibility
//! - Define stored entities (`User`, `Contact`, `Address`).
//! - Define inbound request shapes and outbound shaped responses.
//! - Define the success/error wire envelopes.
//!
//! # Invariants
//! - Ownership is a strict tree: `User -> Contact -> Address`.
//! - Shaped responses never expose password digests; optional strings are
//!   rendered as `""` rather than `null`.

pub mod address;
pub mod contact;
pub mod user;
pub mod web;
