//! Per-category and per-month totals over a user's transactions.
//!
//! Category totals are grouped in SQL. Monthly totals are bucketed in Rust from
//! the raw rows so that the month arithmetic does not depend on the SQL dialect.

use std::{collections::BTreeMap, ops::RangeInclusive};

use rusqlite::Connection;
use serde::Serialize;
use time::{Date, Month};

use crate::{Error, UserID};

use super::{core::TransactionType, range::first_of_month};

/// The sum of amounts for one exact category value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// `None` groups the transactions with no category.
    pub category: Option<String>,
    pub total: f64,
}

/// Income and expense totals over a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TypeTotals {
    pub income: f64,
    pub expense: f64,
}

impl TypeTotals {
    /// Income minus expenses.
    pub fn net_income(&self) -> f64 {
        self.income - self.expense
    }
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// The month label, e.g. "Jan 2024".
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

impl MonthlySummary {
    /// Income minus expenses.
    pub fn net_income(&self) -> f64 {
        self.income - self.expense
    }
}

/// Sum the user's transactions of `type_` dated within `range`, grouped by category.
///
/// The order of the returned totals is unspecified.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_category_breakdown(
    user_id: UserID,
    range: RangeInclusive<Date>,
    type_: TransactionType,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    let (from, to) = range.into_inner();

    connection
        .prepare(
            "SELECT category, SUM(amount) FROM \"transaction\"
             WHERE user_id = ?1 AND type = ?2 AND date BETWEEN ?3 AND ?4
             GROUP BY category",
        )?
        .query_map((user_id, type_, from, to), |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .map(|total_result| total_result.map_err(Error::from))
        .collect()
}

/// Sum the user's income and expenses dated within `range`.
///
/// A type with no transactions in range has a total of zero.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_type_totals(
    user_id: UserID,
    range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<TypeTotals, Error> {
    let (from, to) = range.into_inner();

    let mut totals = TypeTotals::default();
    let rows = connection
        .prepare(
            "SELECT type, SUM(amount) FROM \"transaction\"
             WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
             GROUP BY type",
        )?
        .query_map((user_id, from, to), |row| {
            Ok((row.get::<_, TransactionType>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for (type_, total) in rows {
        match type_ {
            TransactionType::Income => totals.income = total,
            TransactionType::Expense => totals.expense = total,
        }
    }

    Ok(totals)
}

/// Get the user's income and expense totals for each month within `range`.
///
/// Only months with at least one transaction are returned, oldest first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_monthly_summary(
    user_id: UserID,
    range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<MonthlySummary>, Error> {
    let (from, to) = range.into_inner();

    let rows: Vec<(Date, TransactionType, f64)> = connection
        .prepare(
            "SELECT date, type, amount FROM \"transaction\"
             WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3",
        )?
        .query_map((user_id, from, to), |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<Result<_, _>>()?;

    Ok(bucket_by_month(&rows))
}

/// Sum `(date, type, amount)` rows into one [MonthlySummary] per calendar month.
pub fn bucket_by_month(rows: &[(Date, TransactionType, f64)]) -> Vec<MonthlySummary> {
    let mut buckets: BTreeMap<Date, TypeTotals> = BTreeMap::new();

    for (date, type_, amount) in rows {
        let totals = buckets.entry(first_of_month(*date)).or_default();

        match type_ {
            TransactionType::Income => totals.income += amount,
            TransactionType::Expense => totals.expense += amount,
        }
    }

    buckets
        .into_iter()
        .map(|(month, totals)| MonthlySummary {
            month: format_month_label(month),
            income: totals.income,
            expense: totals.expense,
        })
        .collect()
}

fn format_month_label(date: Date) -> String {
    let month = match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{month} {}", date.year())
}


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        User,
        test_utils::{get_test_connection, insert_test_user},
        transaction::core::{Transaction, TransactionType, create_transaction},
    };

    use super::{
        CategoryTotal, MonthlySummary, TypeTotals, get_category_breakdown, get_monthly_summary,
        get_type_totals,
    };

    fn setup() -> (Connection, User, User) {
        let conn = get_test_connection();
        let alice = insert_test_user("alice@example.com", &conn);
        let bob = insert_test_user("bob@example.com", &conn);

        (conn, alice, bob)
    }

    fn insert(
        user: &User,
        type_: TransactionType,
        category: Option<&str>,
        amount: f64,
        date: time::Date,
        conn: &Connection,
    ) {
        create_transaction(
            user.id,
            Transaction::build(type_, amount, date).category(category.map(str::to_owned)),
            conn,
        )
        .unwrap();
    }

    #[test]
    fn groups_expenses_by_category() {
        let (conn, alice, _) = setup();
        insert(&alice, TransactionType::Expense, Some("Food"), 50.0, date!(2024 - 01 - 05), &conn);
        insert(&alice, TransactionType::Expense, Some("Food"), 30.0, date!(2024 - 01 - 10), &conn);

        let breakdown = get_category_breakdown(
            alice.id,
            date!(2024 - 01 - 01)..=date!(2024 - 01 - 31),
            TransactionType::Expense,
            &conn,
        )
        .unwrap();

        assert_eq!(
            breakdown,
            vec![CategoryTotal {
                category: Some("Food".to_owned()),
                total: 80.0,
            }]
        );
    }

    #[test]
    fn breakdown_totals_sum_to_filtered_amounts() {
        let (conn, alice, _) = setup();
        insert(&alice, TransactionType::Expense, Some("Food"), 12.5, date!(2024 - 01 - 05), &conn);
        insert(&alice, TransactionType::Expense, Some("Rent"), 400.0, date!(2024 - 01 - 01), &conn);
        insert(&alice, TransactionType::Expense, None, 7.25, date!(2024 - 01 - 31), &conn);
        insert(&alice, TransactionType::Expense, None, 2.75, date!(2024 - 01 - 20), &conn);
        // Outside the range or of the other type.
        insert(&alice, TransactionType::Expense, Some("Food"), 99.0, date!(2024 - 02 - 01), &conn);
        insert(&alice, TransactionType::Income, Some("Food"), 1000.0, date!(2024 - 01 - 15), &conn);

        let mut breakdown = get_category_breakdown(
            alice.id,
            date!(2024 - 01 - 01)..=date!(2024 - 01 - 31),
            TransactionType::Expense,
            &conn,
        )
        .unwrap();
        breakdown.sort_by(|a, b| a.category.cmp(&b.category));

        assert_eq!(
            breakdown,
            vec![
                CategoryTotal {
                    category: None,
                    total: 10.0,
                },
                CategoryTotal {
                    category: Some("Food".to_owned()),
                    total: 12.5,
                },
                CategoryTotal {
                    category: Some("Rent".to_owned()),
                    total: 400.0,
                },
            ]
        );
        let sum: f64 = breakdown.iter().map(|total| total.total).sum();
        assert_eq!(sum, 422.5);
    }

    #[test]
    fn monthly_summary_for_single_month() {
        let (conn, alice, _) = setup();
        insert(&alice, TransactionType::Income, None, 1000.0, date!(2024 - 01 - 15), &conn);
        insert(&alice, TransactionType::Expense, None, 400.0, date!(2024 - 01 - 20), &conn);

        let summary = get_monthly_summary(
            alice.id,
            date!(2024 - 01 - 01)..=date!(2024 - 01 - 31),
            &conn,
        )
        .unwrap();

        assert_eq!(
            summary,
            vec![MonthlySummary {
                month: "Jan 2024".to_owned(),
                income: 1000.0,
                expense: 400.0,
            }]
        );
        assert_eq!(summary[0].net_income(), 600.0);
    }

    #[test]
    fn monthly_summary_shows_zero_for_missing_type() {
        let (conn, alice, _) = setup();
        insert(&alice, TransactionType::Income, None, 250.0, date!(2024 - 03 - 01), &conn);
        insert(&alice, TransactionType::Expense, None, 80.0, date!(2024 - 04 - 30), &conn);

        let summary = get_monthly_summary(
            alice.id,
            date!(2024 - 01 - 01)..=date!(2024 - 12 - 31),
            &conn,
        )
        .unwrap();

        assert_eq!(
            summary,
            vec![
                MonthlySummary {
                    month: "Mar 2024".to_owned(),
                    income: 250.0,
                    expense: 0.0,
                },
                MonthlySummary {
                    month: "Apr 2024".to_owned(),
                    income: 0.0,
                    expense: 80.0,
                },
            ]
        );
        for month in &summary {
            assert_eq!(month.net_income(), month.income - month.expense);
        }
    }

    #[test]
    fn type_totals_cover_whole_range() {
        let (conn, alice, _) = setup();
        insert(&alice, TransactionType::Income, None, 1000.0, date!(2024 - 01 - 15), &conn);
        insert(&alice, TransactionType::Income, None, 500.0, date!(2024 - 02 - 15), &conn);
        insert(&alice, TransactionType::Expense, None, 400.0, date!(2024 - 01 - 20), &conn);

        let totals = get_type_totals(
            alice.id,
            date!(2024 - 01 - 01)..=date!(2024 - 02 - 29),
            &conn,
        )
        .unwrap();

        assert_eq!(
            totals,
            TypeTotals {
                income: 1500.0,
                expense: 400.0,
            }
        );
        assert_eq!(totals.net_income(), 1100.0);
    }

    #[test]
    fn type_totals_are_zero_without_transactions() {
        let (conn, alice, _) = setup();

        let totals = get_type_totals(
            alice.id,
            date!(2024 - 01 - 01)..=date!(2024 - 01 - 31),
            &conn,
        )
        .unwrap();

        assert_eq!(totals, TypeTotals::default());
    }

    #[test]
    fn aggregates_ignore_other_users() {
        let (conn, alice, bob) = setup();
        insert(&alice, TransactionType::Expense, Some("Food"), 50.0, date!(2024 - 01 - 05), &conn);
        insert(&alice, TransactionType::Income, None, 1000.0, date!(2024 - 01 - 15), &conn);
        let range = date!(2024 - 01 - 01)..=date!(2024 - 01 - 31);

        assert!(
            get_category_breakdown(bob.id, range.clone(), TransactionType::Expense, &conn)
                .unwrap()
                .is_empty()
        );
        assert!(get_monthly_summary(bob.id, range.clone(), &conn).unwrap().is_empty());
        assert_eq!(
            get_type_totals(bob.id, range, &conn).unwrap(),
            TypeTotals::default()
        );
    }
}
