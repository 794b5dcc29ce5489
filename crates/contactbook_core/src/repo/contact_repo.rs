//! Contact table descriptor.

use super::sqlite::{text_or_null, SqliteRepository, SqliteTable};
use super::RepoResult;
use crate::model::contact::{fields, Contact, ContactChanges, NewContact};
use rusqlite::types::Value;
use rusqlite::Row;

pub struct ContactTable;

pub type SqliteContactRepository<'conn> = SqliteRepository<'conn, ContactTable>;

impl SqliteTable for ContactTable {
    type Entity = Contact;
    type Draft = NewContact;
    type Changes = ContactChanges;

    const TABLE: &'static str = fields::COLLECTION;
    const COLUMNS: &'static [&'static str] = &[
        fields::ID,
        fields::USERNAME,
        fields::FIRST_NAME,
        fields::LAST_NAME,
        fields::EMAIL,
        fields::PHONE,
    ];
    const ORDER_BY: &'static str = fields::ID;

    fn parse_row(row: &Row<'_>) -> RepoResult<Contact> {
        Ok(Contact {
            id: row.get(0)?,
            username: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            email: row.get(4)?,
            phone: row.get(5)?,
        })
    }

    fn draft_values(draft: &NewContact) -> Vec<(&'static str, Value)> {
        vec![
            (fields::USERNAME, Value::Text(draft.username.clone())),
            (fields::FIRST_NAME, Value::Text(draft.first_name.clone())),
            (fields::LAST_NAME, text_or_null(draft.last_name.as_deref())),
            (fields::EMAIL, text_or_null(draft.email.as_deref())),
            (fields::PHONE, text_or_null(draft.phone.as_deref())),
        ]
    }

    // Contacts are replaced wholesale; owner and id never change.
    fn change_values(changes: &ContactChanges) -> Vec<(&'static str, Value)> {
        vec![
            (fields::FIRST_NAME, Value::Text(changes.first_name.clone())),
            (fields::LAST_NAME, text_or_null(changes.last_name.as_deref())),
            (fields::EMAIL, text_or_null(changes.email.as_deref())),
            (fields::PHONE, text_or_null(changes.phone.as_deref())),
        ]
    }
}
