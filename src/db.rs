//! Database setup and access to the shared connection.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, Error, transaction::create_transaction_table, user::create_user_table};

/// State for handlers that need nothing but the database.
#[derive(Debug, Clone)]
pub struct DbState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DbState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl DbState {
    pub fn new(connection: Connection) -> Self {
        Self {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }
}

/// Lock the shared connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if a thread panicked while holding the lock.
pub fn lock_connection(db_connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Enable foreign keys and create the application tables if they do not exist.
///
/// The tables are created inside a single SQL transaction so a failure leaves
/// the database untouched.
///
/// # Errors
/// Returns [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = connection.unchecked_transaction()?;
    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;
    transaction.commit()?;

    Ok(())
}
