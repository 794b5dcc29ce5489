//! Generic SQLite implementation of [`ResourceRepository`].
//!
//! # Responsibility
//! - Render [`Predicate`] trees into parameterized `WHERE` clauses.
//! - Run single-statement reads and writes, returning affected rows via
//!   `RETURNING` so scoped mutations stay atomic.
//!
//! # Invariants
//! - Only values are bound as parameters; identifiers come from
//!   `'static` table descriptors.
//! - Paged reads are ordered by the table's primary key.
//! - Case-insensitive matches need `unicode_lower`, registered by
//!   `db::open_db*`.

use super::{RepoError, RepoResult, ResourceRepository};
use crate::db::migrations::ensure_table_ready;
use crate::db::UNICODE_LOWER_FN;
use crate::query::{Predicate, Scalar, Window};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::marker::PhantomData;

/// Table descriptor and row codec for one entity.
pub trait SqliteTable {
    type Entity;
    type Draft;
    type Changes;

    const TABLE: &'static str;
    /// Every column read back into `Entity`, in `SELECT` order.
    const COLUMNS: &'static [&'static str];
    const ORDER_BY: &'static str;

    fn parse_row(row: &Row<'_>) -> RepoResult<Self::Entity>;
    fn draft_values(draft: &Self::Draft) -> Vec<(&'static str, Value)>;
    /// Column assignments for an update; empty means "nothing to change".
    fn change_values(changes: &Self::Changes) -> Vec<(&'static str, Value)>;
}

/// SQLite-backed repository over one table descriptor.
pub struct SqliteRepository<'conn, T> {
    conn: &'conn Connection,
    table: PhantomData<T>,
}

impl<'conn, T: SqliteTable> SqliteRepository<'conn, T> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, T::TABLE, T::COLUMNS)?;
        Ok(Self {
            conn,
            table: PhantomData,
        })
    }

    fn column_list() -> String {
        T::COLUMNS.join(", ")
    }

    fn fetch(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<T::Entity>> {
        debug!(
            "event=repo_query module=repo status=start table={} binds={}",
            T::TABLE,
            bind_values.len()
        );
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(T::parse_row(row)?);
        }
        Ok(entities)
    }

    fn fetch_first(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Option<T::Entity>> {
        Ok(self.fetch(sql, bind_values)?.into_iter().next())
    }
}

impl<T: SqliteTable> ResourceRepository for SqliteRepository<'_, T> {
    type Entity = T::Entity;
    type Draft = T::Draft;
    type Changes = T::Changes;

    fn find_one(&self, filter: &Predicate) -> RepoResult<Option<T::Entity>> {
        let mut bind_values = Vec::new();
        let clause = render_predicate(filter, &mut bind_values);
        let sql = format!(
            "SELECT {} FROM {} WHERE {clause} ORDER BY {} LIMIT 1;",
            Self::column_list(),
            T::TABLE,
            T::ORDER_BY
        );
        self.fetch_first(&sql, bind_values)
    }

    fn find_many(&self, filter: &Predicate, window: Window) -> RepoResult<Vec<T::Entity>> {
        let mut bind_values = Vec::new();
        let clause = render_predicate(filter, &mut bind_values);
        let sql = format!(
            "SELECT {} FROM {} WHERE {clause} ORDER BY {} LIMIT ? OFFSET ?;",
            Self::column_list(),
            T::TABLE,
            T::ORDER_BY
        );
        bind_values.push(Value::Integer(to_sql_integer(window.take)?));
        bind_values.push(Value::Integer(to_sql_integer(window.skip)?));
        self.fetch(&sql, bind_values)
    }

    fn count(&self, filter: &Predicate) -> RepoResult<u64> {
        let mut bind_values = Vec::new();
        let clause = render_predicate(filter, &mut bind_values);
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {clause};", T::TABLE);
        let total: i64 =
            self.conn
                .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {total}")))
    }

    fn create(&self, draft: &T::Draft) -> RepoResult<T::Entity> {
        let values = T::draft_values(draft);
        let columns = values
            .iter()
            .map(|(column, _)| *column)
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; values.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders}) RETURNING {};",
            T::TABLE,
            Self::column_list()
        );
        let bind_values = values.into_iter().map(|(_, value)| value).collect();

        self.fetch_first(&sql, bind_values)?.ok_or_else(|| {
            RepoError::InvalidData(format!("insert into {} returned no row", T::TABLE))
        })
    }

    fn update(&self, filter: &Predicate, changes: &T::Changes) -> RepoResult<Option<T::Entity>> {
        let values = T::change_values(changes);
        if values.is_empty() {
            return self.find_one(filter);
        }

        let assignments = values
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut bind_values = values
            .into_iter()
            .map(|(_, value)| value)
            .collect::<Vec<_>>();
        let clause = render_predicate(filter, &mut bind_values);
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE {clause} RETURNING {};",
            T::TABLE,
            Self::column_list()
        );
        self.fetch_first(&sql, bind_values)
    }

    fn delete(&self, filter: &Predicate) -> RepoResult<Option<T::Entity>> {
        let mut bind_values = Vec::new();
        let clause = render_predicate(filter, &mut bind_values);
        let sql = format!(
            "DELETE FROM {} WHERE {clause} RETURNING {};",
            T::TABLE,
            Self::column_list()
        );
        self.fetch_first(&sql, bind_values)
    }
}

/// Renders `predicate` as SQL, appending its parameters in textual order.
fn render_predicate(predicate: &Predicate, bind_values: &mut Vec<Value>) -> String {
    match predicate {
        Predicate::Eq { column, value } => {
            bind_values.push(scalar_to_value(value));
            format!("{column} = ?")
        }
        Predicate::ContainsInsensitive { column, needle } => {
            bind_values.push(Value::Text(format!(
                "%{}%",
                escape_like(&needle.to_lowercase())
            )));
            format!("{UNICODE_LOWER_FN}({column}) LIKE ? ESCAPE '\\'")
        }
        Predicate::And(parts) => render_group(parts, " AND ", "1 = 1", bind_values),
        Predicate::Or(parts) => render_group(parts, " OR ", "1 = 0", bind_values),
        Predicate::InSelect {
            column,
            collection,
            select,
            filter,
        } => {
            let inner = render_predicate(filter, bind_values);
            format!("{column} IN (SELECT {select} FROM {collection} WHERE {inner})")
        }
    }
}

fn render_group(
    parts: &[Predicate],
    separator: &str,
    empty: &str,
    bind_values: &mut Vec<Value>,
) -> String {
    if parts.is_empty() {
        return empty.to_string();
    }
    let rendered = parts
        .iter()
        .map(|part| render_predicate(part, bind_values))
        .collect::<Vec<_>>();
    format!("({})", rendered.join(separator))
}

fn scalar_to_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Text(text) => Value::Text(text.clone()),
        Scalar::Integer(number) => Value::Integer(*number),
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn to_sql_integer(value: u64) -> RepoResult<i64> {
    i64::try_from(value).map_err(|_| RepoError::InvalidData(format!("window {value} too large")))
}

/// Maps an optional string to `TEXT` or `NULL`.
pub(crate) fn text_or_null(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::Text(text.to_string()))
}
