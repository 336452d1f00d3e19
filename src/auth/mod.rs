//! Account registration, log-in and cookie based session handling.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register;
mod token;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use time::Duration;

use crate::AppState;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx, auth_guard_json};
pub use register::{get_register_page, register_user};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;

/// What the log-in and registration handlers need to check credentials and
/// start a session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub cookie_key: Key,
    /// Auth cookie lifetime unless the user asks to be remembered.
    pub cookie_duration: Duration,
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<SessionState> for Key {
    fn from_ref(state: &SessionState) -> Self {
        state.cookie_key.clone()
    }
}
