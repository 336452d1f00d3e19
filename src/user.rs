//! User accounts and their storage in the `user` table.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// Every transaction query takes one of these, so a user ID cannot be
/// confused with a transaction ID at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for UserID {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for UserID {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(UserID)
    }
}

/// Someone who can log in and own transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserID,
    /// Always stored trimmed and lowercased, see [normalize_email].
    pub email: String,
    pub password_hash: PasswordHash,
}

/// Create the `user` table if it does not exist yet.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Emails are matched without regard to case or surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                ..
            },
            _,
        )
    )
}

/// Register a new user.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] if the email is taken, or [Error::SqlError]
/// for any other database failure.
pub fn create_user(
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let email = normalize_email(email);

    match connection.execute(
        "INSERT INTO user (email, password) VALUES (?1, ?2)",
        (&email, password_hash.as_ref()),
    ) {
        Ok(_) => Ok(User {
            id: UserID::new(connection.last_insert_rowid()),
            email,
            password_hash,
        }),
        Err(error) if is_unique_violation(&error) => Err(Error::DuplicateEmail(email)),
        Err(error) => Err(error.into()),
    }
}

const SELECT_USER: &str = "SELECT id, email, password FROM user";

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let password_hash: String = row.get("password")?;

    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        password_hash: PasswordHash::new_unchecked(&password_hash),
    })
}

/// # Errors
///
/// Returns [Error::NotFound] if there is no user with the ID `user_id`.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    let user = connection.query_row(
        &format!("{SELECT_USER} WHERE id = ?1"),
        [user_id],
        map_user_row,
    )?;

    Ok(user)
}

/// Look up a user by email, ignoring case.
///
/// # Errors
///
/// Returns [Error::NotFound] if nobody has registered with `email`.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    let user = connection.query_row(
        &format!("{SELECT_USER} WHERE email = ?1"),
        [normalize_email(email)],
        map_user_row,
    )?;

    Ok(user)
}

/// Replace the stored password hash of `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no user with the ID `user_id`.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}
