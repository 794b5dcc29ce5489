//! Storage-agnostic query building.
//!
//! # Responsibility
//! - Express repository filters as small composable predicates.
//! - Compute paging windows and paging metadata.
//!
//! # Invariants
//! - Column and collection names are `'static` identifiers chosen by the
//!   model layer; only values are caller-controlled.
//! - `and([])` matches everything, `or([])` matches nothing.

mod paging;

pub use paging::{total_pages, Pagination, Window};

/// Comparable value bound into a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Filter tree consumed by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq {
        column: &'static str,
        value: Scalar,
    },
    /// Case-insensitive substring match. Absent (`NULL`) columns never match.
    ContainsInsensitive {
        column: &'static str,
        needle: String,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    /// `column IN (SELECT select FROM collection WHERE filter)`.
    InSelect {
        column: &'static str,
        collection: &'static str,
        select: &'static str,
        filter: Box<Predicate>,
    },
}

impl Predicate {
    pub fn eq(column: &'static str, value: impl Into<Scalar>) -> Self {
        Self::Eq {
            column,
            value: value.into(),
        }
    }

    pub fn contains_insensitive(column: &'static str, needle: impl Into<String>) -> Self {
        Self::ContainsInsensitive {
            column,
            needle: needle.into(),
        }
    }

    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self::And(predicates.into_iter().collect())
    }

    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self::Or(predicates.into_iter().collect())
    }

    pub fn in_select(
        column: &'static str,
        collection: &'static str,
        select: &'static str,
        filter: Predicate,
    ) -> Self {
        Self::InSelect {
            column,
            collection,
            select,
            filter: Box::new(filter),
        }
    }

    /// Conjoins `other`, flattening nested conjunctions.
    pub fn and_also(self, other: Predicate) -> Self {
        match self {
            Self::And(mut predicates) => {
                predicates.push(other);
                Self::And(predicates)
            }
            single => Self::And(vec![single, other]),
        }
    }
}
