//! User table descriptor.

use super::sqlite::{text_or_null, SqliteRepository, SqliteTable};
use super::RepoResult;
use crate::model::user::{fields, NewUser, User, UserChanges};
use rusqlite::types::Value;
use rusqlite::Row;

pub struct UserTable;

pub type SqliteUserRepository<'conn> = SqliteRepository<'conn, UserTable>;

impl SqliteTable for UserTable {
    type Entity = User;
    type Draft = NewUser;
    type Changes = UserChanges;

    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] =
        &[fields::USERNAME, fields::NAME, fields::PASSWORD, fields::TOKEN];
    const ORDER_BY: &'static str = fields::USERNAME;

    fn parse_row(row: &Row<'_>) -> RepoResult<User> {
        Ok(User {
            username: row.get(0)?,
            name: row.get(1)?,
            password: row.get(2)?,
            token: row.get(3)?,
        })
    }

    fn draft_values(draft: &NewUser) -> Vec<(&'static str, Value)> {
        vec![
            (fields::USERNAME, Value::Text(draft.username.clone())),
            (fields::NAME, Value::Text(draft.name.clone())),
            (fields::PASSWORD, Value::Text(draft.password_digest.clone())),
        ]
    }

    fn change_values(changes: &UserChanges) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        if let Some(name) = &changes.name {
            values.push((fields::NAME, Value::Text(name.clone())));
        }
        if let Some(digest) = &changes.password_digest {
            values.push((fields::PASSWORD, Value::Text(digest.clone())));
        }
        if let Some(token) = &changes.token {
            values.push((fields::TOKEN, text_or_null(token.as_deref())));
        }
        values
    }
}
