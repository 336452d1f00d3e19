//! Defines the core data models and database queries for transactions.
//!
//! Every query takes the [UserID] of the caller and filters on it, so a user
//! can never read or change another user's transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql, params_from_iter,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, UserID, ValidationError};

/// The ID the database assigns to a transaction.
pub type TransactionId = i64;

/// The number of rows changed by an update or delete.
pub type RowsAffected = usize;

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in the database, forms and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(ValidationError::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// A free-text label such as "Food", grouped by exact value in reports.
    pub category: Option<String>,
    /// The amount of money spent or earned. Always greater than zero.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened.
    pub date: Date,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(type_: TransactionType, amount: f64, date: Date) -> NewTransaction {
        NewTransaction {
            type_,
            category: None,
            amount,
            description: None,
            date,
        }
    }
}

/// The fields of a transaction that has not been saved yet.
///
/// ```ignore
/// let new_transaction = Transaction::build(TransactionType::Expense, 45.99, date!(2025-01-15))
///     .category(Some("Food".to_owned()))
///     .description(Some("Lunch".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub type_: TransactionType,
    pub category: Option<String>,
    pub amount: f64,
    pub description: Option<String>,
    pub date: Date,
}

impl NewTransaction {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// A partial update to a transaction.
///
/// `None` leaves the field unchanged. The optional text fields use
/// `Some(None)` to clear the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    pub type_: Option<TransactionType>,
    pub category: Option<Option<String>>,
    pub amount: Option<f64>,
    pub description: Option<Option<String>>,
    pub date: Option<Date>,
}

/// The largest amount a single transaction may have.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Check that `amount` is a finite number greater than zero and no more
/// than [MAX_AMOUNT].
///
/// # Errors
/// Returns [ValidationError::NonPositiveAmount] if the amount is not
/// positive, or [ValidationError::AmountTooLarge] if it is over the cap.
pub fn validate_amount(amount: f64) -> Result<f64, ValidationError> {
    if !(amount.is_finite() && amount > 0.0) {
        Err(ValidationError::NonPositiveAmount(amount))
    } else if amount > MAX_AMOUNT {
        Err(ValidationError::AmountTooLarge(amount))
    } else {
        Ok(amount)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the amount is not positive, in which case nothing is written,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let amount = validate_amount(new_transaction.amount)?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, type, category, amount, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, type, category, amount, description, date",
        )?
        .query_row(
            (
                user_id,
                new_transaction.type_,
                new_transaction.category,
                amount,
                new_transaction.description,
                new_transaction.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction `id` if it belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of the user's transactions,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, type, category, amount, description, date FROM \"transaction\"
             WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id as &dyn ToSql), (":user_id", &user_id)],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Apply `update` to the transaction `id` if it belongs to `user_id`.
///
/// A transaction that does not exist and one owned by another user look the
/// same: both return zero rows and no error. An empty update changes nothing
/// and returns the number of rows it would have matched.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if a new amount is given and it is not positive,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    user_id: UserID,
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    let mut assignments: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(type_) = update.type_ {
        assignments.push("type = ?");
        values.push(Box::new(type_));
    }
    if let Some(category) = update.category {
        assignments.push("category = ?");
        values.push(Box::new(category));
    }
    if let Some(amount) = update.amount {
        assignments.push("amount = ?");
        values.push(Box::new(validate_amount(amount)?));
    }
    if let Some(description) = update.description {
        assignments.push("description = ?");
        values.push(Box::new(description));
    }
    if let Some(date) = update.date {
        assignments.push("date = ?");
        values.push(Box::new(date));
    }

    if assignments.is_empty() {
        let matched: i64 = connection.query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (id, user_id),
            |row| row.get(0),
        )?;

        return Ok(matched as RowsAffected);
    }

    values.push(Box::new(id));
    values.push(Box::new(user_id));
    let query = format!(
        "UPDATE \"transaction\" SET {} WHERE id = ? AND user_id = ?",
        assignments.join(", ")
    );

    let rows_affected = connection.execute(&query, params_from_iter(values.iter()))?;

    Ok(rows_affected)
}

/// Delete the transaction `id` if it belongs to `user_id`.
///
/// Like [update_transaction], a missing or foreign transaction is not an error.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    Ok(rows_affected)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT,
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT,
                date TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Every query filters on the owner and most on a date range as well.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        type_: row.get(2)?,
        category: row.get(3)?,
        amount: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
