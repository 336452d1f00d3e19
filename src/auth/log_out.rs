//! Ending a session.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::invalidate_auth_cookie, endpoints};

/// Expire the auth cookie and send the client back to the log-in page.
///
/// Works without a valid session, so stale cookies can always be cleared.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    (invalidate_auth_cookie(jar), Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
