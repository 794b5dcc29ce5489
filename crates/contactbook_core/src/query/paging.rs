//! Page window arithmetic.
//!
//! `skip = (page - 1) * limit`, `take = limit`,
//! `total_page = ceil(total / limit)`.

use crate::model::web::Paging;
use crate::validation::ValidationError;

/// Validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

/// Rows to skip and take for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub take: u64,
}

impl Pagination {
    /// Builds a pagination from raw request values.
    ///
    /// # Errors
    /// - `NotPositive` when `page` or `limit` is zero or negative.
    /// - `OutOfRange` when the skip offset does not fit a signed 64-bit
    ///   storage offset.
    pub fn try_new(page: i64, limit: i64) -> Result<Self, ValidationError> {
        if page <= 0 {
            return Err(ValidationError::NotPositive { field: "page" });
        }
        if limit <= 0 {
            return Err(ValidationError::NotPositive { field: "limit" });
        }
        if (page - 1).checked_mul(limit).is_none() {
            return Err(ValidationError::OutOfRange { field: "page" });
        }

        Ok(Self {
            page: page.unsigned_abs(),
            limit: limit.unsigned_abs(),
        })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn window(&self) -> Window {
        Window {
            skip: (self.page - 1) * self.limit,
            take: self.limit,
        }
    }

    /// Paging metadata for a result set of `total` matching rows.
    pub fn paging(&self, total: u64) -> Paging {
        Paging {
            page: self.page,
            limit: self.limit,
            total_page: total_pages(total, self.limit),
        }
    }
}

/// `ceil(total / limit)`; zero rows yield zero pages.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

#[cfg(test)]
mod tests {
    use super::{total_pages, Pagination, Window};
    use crate::validation::ValidationError;

    #[test]
    fn window_follows_page_and_limit() {
        let first = Pagination::try_new(1, 10).expect("valid");
        assert_eq!(first.window(), Window { skip: 0, take: 10 });

        let third = Pagination::try_new(3, 4).expect("valid");
        assert_eq!(third.window(), Window { skip: 8, take: 4 });
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(7, 3), 3);
    }

    #[test]
    fn rejects_non_positive_and_overflowing_values() {
        assert_eq!(
            Pagination::try_new(0, 10).unwrap_err(),
            ValidationError::NotPositive { field: "page" }
        );
        assert_eq!(
            Pagination::try_new(1, -5).unwrap_err(),
            ValidationError::NotPositive { field: "limit" }
        );
        assert_eq!(
            Pagination::try_new(i64::MAX, 2).unwrap_err(),
            ValidationError::OutOfRange { field: "page" }
        );
    }

    #[test]
    fn paging_reports_request_and_page_count() {
        let paging = Pagination::try_new(2, 5).expect("valid").paging(12);
        assert_eq!((paging.page, paging.limit, paging.total_page), (2, 5, 3));
    }
}
