//! Repository contracts and SQLite persistence.
//!
//! # Responsibility
//! - Define the scoped-CRUD contract every resource service consumes.
//! - Keep SQL details behind the repository boundary.
//!
//! # Invariants
//! - Every read, update and delete is scoped by a caller-supplied
//!   [`Predicate`]; repositories never widen it.
//! - `update`/`delete` return `None` when the filter matched no row, so an
//!   ownership filter and its mutation form one statement.
//! - Unique and foreign-key violations surface as semantic errors
//!   (`Conflict`, `MissingParent`) rather than transport errors.

pub mod address_repo;
pub mod contact_repo;
pub mod sqlite;
pub mod user_repo;

use crate::db::DbError;
use crate::model::address::{Address, AddressChanges, NewAddress};
use crate::model::contact::{Contact, ContactChanges, NewContact};
use crate::model::user::{NewUser, User, UserChanges};
use crate::query::{Predicate, Window};
use rusqlite::ffi;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use address_repo::SqliteAddressRepository;
pub use contact_repo::SqliteContactRepository;
pub use sqlite::{SqliteRepository, SqliteTable};
pub use user_repo::SqliteUserRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A unique key already holds the written value.
    Conflict(String),
    /// A foreign key points at a row that does not exist.
    MissingParent(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Conflict(message) => write!(f, "unique constraint violated: {message}"),
            Self::MissingParent(message) => {
                write!(f, "foreign key constraint violated: {message}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Conflict(_) | Self::MissingParent(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            let detail = message.clone().unwrap_or_else(|| failure.to_string());
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Self::Conflict(detail);
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return Self::MissingParent(detail),
                _ => {}
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Scoped CRUD + query contract shared by users, contacts and addresses.
pub trait ResourceRepository {
    type Entity;
    /// Insert shape.
    type Draft;
    /// Update shape.
    type Changes;

    fn find_one(&self, filter: &Predicate) -> RepoResult<Option<Self::Entity>>;
    /// Rows matching `filter` in stable primary-key order, windowed.
    fn find_many(&self, filter: &Predicate, window: Window) -> RepoResult<Vec<Self::Entity>>;
    fn count(&self, filter: &Predicate) -> RepoResult<u64>;
    fn create(&self, draft: &Self::Draft) -> RepoResult<Self::Entity>;
    /// Applies `changes` to the row matching `filter` and returns it.
    fn update(&self, filter: &Predicate, changes: &Self::Changes)
        -> RepoResult<Option<Self::Entity>>;
    /// Deletes the row matching `filter` and returns its last state.
    fn delete(&self, filter: &Predicate) -> RepoResult<Option<Self::Entity>>;
}

pub trait UserRepository:
    ResourceRepository<Entity = User, Draft = NewUser, Changes = UserChanges>
{
}

impl<T> UserRepository for T where
    T: ResourceRepository<Entity = User, Draft = NewUser, Changes = UserChanges>
{
}

pub trait ContactRepository:
    ResourceRepository<Entity = Contact, Draft = NewContact, Changes = ContactChanges>
{
}

impl<T> ContactRepository for T where
    T: ResourceRepository<Entity = Contact, Draft = NewContact, Changes = ContactChanges>
{
}

pub trait AddressRepository:
    ResourceRepository<Entity = Address, Draft = NewAddress, Changes = AddressChanges>
{
}

impl<T> AddressRepository for T where
    T: ResourceRepository<Entity = Address, Draft = NewAddress, Changes = AddressChanges>
{
}
