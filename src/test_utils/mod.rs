#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    AppState, PasswordHash, User, ValidatedPassword, auth::COOKIE_TOKEN, build_router, db,
    endpoints, pagination::PaginationConfig, user::create_user,
};

pub(crate) use form::{assert_form_error_message, assert_form_input, assert_hx_endpoint, must_get_form};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, select_text};
pub(crate) use http::assert_hx_redirect;

pub(crate) const TEST_EMAIL: &str = "test@example.com";
pub(crate) const TEST_PASSWORD: &str = "averylongandsecurepassword";

/// An in-memory database with all tables created and foreign keys enabled.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    db::initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user with the given email and [TEST_PASSWORD].
pub(crate) fn insert_test_user(email: &str, connection: &Connection) -> User {
    let password_hash = PasswordHash::new(ValidatedPassword::new_unchecked(TEST_PASSWORD), 4)
        .expect("Could not hash test password");

    create_user(email, password_hash, connection).expect("Could not create test user")
}

pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, "42", "Etc/UTC", PaginationConfig::default())
        .expect("Could not create app state")
}

/// Log in through the app router and return the auth cookie.
pub(crate) async fn log_in(server: &TestServer, email: &str) -> Cookie<'static> {
    let response = server
        .post(endpoints::LOG_IN_API)
        .form(&[("email", email), ("password", TEST_PASSWORD)])
        .await;

    response.cookie(COOKIE_TOKEN)
}

/// A test server for the full app with one registered user and their auth cookie.
pub(crate) async fn get_authenticated_server() -> (TestServer, AppState, User, Cookie<'static>) {
    let state = get_test_app_state();
    let user = insert_test_user(
        TEST_EMAIL,
        &state
            .db_connection
            .lock()
            .expect("Could not acquire database lock"),
    );
    let server =
        TestServer::new(build_router(state.clone()));
    let cookie = log_in(&server, TEST_EMAIL).await;

    (server, state, user, cookie)
}
