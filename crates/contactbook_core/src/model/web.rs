//! Wire envelopes shared by every operation.
//!
//! Success: `{status: "success", message, data, paging?}`.
//! Error: `{status: "error", message, errors?}`.

use serde::{Deserialize, Serialize};

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

pub(crate) fn default_page() -> i64 {
    DEFAULT_PAGE
}

pub(crate) fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Paging metadata for list/search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub page: u64,
    pub limit: u64,
    pub total_page: u64,
}

/// One page of shaped results plus its paging metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResult<T> {
    pub data: Vec<T>,
    pub paging: Paging,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl<T> WebResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.into(),
            data,
            paging: None,
        }
    }
}

impl<T> WebResponse<Vec<T>> {
    pub fn paged(message: impl Into<String>, page: PagedResult<T>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.into(),
            data: page.data,
            paging: Some(page.paging),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: serde_json::Value) -> Self {
        self.errors = Some(errors);
        self
    }
}
