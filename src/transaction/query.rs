//! Paginated listing of a user's transactions in a date range.

use std::ops::RangeInclusive;

use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{Error, UserID, ValidationError};

use super::core::{Transaction, map_transaction_row};

/// The page size used when none is given.
pub const DEFAULT_LIMIT: i64 = 10;
/// The largest page that may be requested.
pub const MAX_LIMIT: i64 = 100;

/// A validated limit and offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: i64,
    offset: i64,
}

impl PageRequest {
    /// Validate the page size and offset, filling in the defaults.
    ///
    /// # Errors
    /// Returns a [ValidationError] if `limit` is outside 1 to 100 or `offset` is negative.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, ValidationError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let offset = offset.unwrap_or(0);

        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ValidationError::LimitOutOfRange(limit));
        }

        if offset < 0 {
            return Err(ValidationError::NegativeOffset(offset));
        }

        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One page of transactions and the number of transactions across all pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub total_count: u64,
}

/// Get a page of the user's transactions dated within `range`, newest first.
///
/// Transactions on the same date are ordered by descending ID so that the
/// order is stable between pages. A range whose start is after its end is
/// empty rather than an error.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_transactions(
    user_id: UserID,
    range: RangeInclusive<Date>,
    page: PageRequest,
    connection: &Connection,
) -> Result<TransactionPage, Error> {
    if range.is_empty() {
        return Ok(TransactionPage {
            items: Vec::new(),
            total_count: 0,
        });
    }

    let (from, to) = range.into_inner();

    let total_count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3",
        (user_id, from, to),
        |row| row.get(0),
    )?;

    let items = connection
        .prepare(
            "SELECT id, user_id, type, category, amount, description, date FROM \"transaction\"
             WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
             ORDER BY date DESC, id DESC
             LIMIT ?4 OFFSET ?5",
        )?
        .query_map(
            (user_id, from, to, page.limit, page.offset),
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TransactionPage {
        items,
        total_count: total_count as u64,
    })
}

#[cfg(test)]
mod page_request_tests {
    use crate::ValidationError;

    use super::PageRequest;

    #[test]
    fn uses_defaults() {
        assert_eq!(PageRequest::new(None, None), Ok(PageRequest::default()));
        assert_eq!(PageRequest::default().limit(), 10);
        assert_eq!(PageRequest::default().offset(), 0);
    }

    #[test]
    fn accepts_limit_bounds() {
        assert!(PageRequest::new(Some(1), Some(0)).is_ok());
        assert!(PageRequest::new(Some(100), Some(5)).is_ok());
    }

    #[test]
    fn rejects_out_of_range_limit() {
        assert_eq!(
            PageRequest::new(Some(0), None),
            Err(ValidationError::LimitOutOfRange(0))
        );
        assert_eq!(
            PageRequest::new(Some(101), None),
            Err(ValidationError::LimitOutOfRange(101))
        );
    }

    #[test]
    fn rejects_negative_offset() {
        assert_eq!(
            PageRequest::new(None, Some(-1)),
            Err(ValidationError::NegativeOffset(-1))
        );
    }
}
