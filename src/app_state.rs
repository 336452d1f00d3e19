//! The shared state handed to every route handler.
//!
//! Handlers do not take [AppState] directly. Each feature defines a smaller
//! state struct with a [FromRef] impl that picks out the fields it needs.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, auth::DEFAULT_COOKIE_DURATION, db::initialize, pagination::PaginationConfig};

/// Everything the route handlers share, cloned into each request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Signs and encrypts the private auth cookies.
    pub cookie_key: Key,

    /// How long a log-in lasts before the user must log in again.
    pub cookie_duration: Duration,

    /// Canonical timezone name used to decide what "today" is for reports
    /// and new transactions.
    pub local_timezone: String,

    /// Page sizes offered on the transactions page.
    pub pagination_config: PaginationConfig,

    /// The finboard database. Every query goes through this one connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Set up the database schema on `db_connection` and build the state.
    ///
    /// `cookie_secret` is hashed into the cookie key, so the same secret keeps
    /// existing sessions valid across restarts.
    ///
    /// # Errors
    /// Returns an error if the users or transactions tables cannot be created.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let cookie_key = create_cookie_key(cookie_secret);
        let db_connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            cookie_key,
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            pagination_config,
            db_connection,
        })
    }
}

/// Lets `PrivateCookieJar` find the key.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Derive a cookie key from `secret`. [Key] needs 64 bytes, which is
/// exactly a SHA-512 digest.
pub fn create_cookie_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}
