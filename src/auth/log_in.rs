//! The log-in page and the form handler that issues the auth cookie.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    Error, UserID,
    auth::{
        SessionState, cookie::set_auth_cookie, invalidate_auth_cookie,
        redirect::normalize_redirect_url,
    },
    db::lock_connection,
    endpoints,
    error_page::get_internal_server_error_redirect,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, auth_card, base, email_input, loading_spinner,
        password_input,
    },
    timezone::get_local_offset,
    user::get_user_by_email,
};

/// Auth cookie lifetime when "keep me logged in" is ticked.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// Shown for both an unknown email and a wrong password.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// The fields of the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    pub email: String,
    /// Checked against the stored hash as-is, so no password rules apply here.
    pub password: String,
    /// A checkbox: any value means checked.
    pub remember_me: Option<String>,
    /// Where to send the user after logging in. Must be a local path.
    pub redirect_url: Option<String>,
}

/// Why a log-in attempt was turned away.
enum LogInFailure {
    InvalidCredentials,
    Internal,
}

impl LogInFailure {
    fn message(&self) -> &'static str {
        match self {
            LogInFailure::InvalidCredentials => INVALID_CREDENTIALS_ERROR_MSG,
            LogInFailure::Internal => "An internal error occurred. Please try again later.",
        }
    }
}

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (email_input(email, None))
            (password_input("", 0, error_message))

            label for="remember_me" class="flex items-center gap-x-3 text-sm font-medium text-gray-900 dark:text-white" {
                input id="remember_me" name="remember_me" type="checkbox" class="rounded-xs";
                "Keep me logged in for one week"
            }

            button id="submit-button" type="submit" class=(BUTTON_PRIMARY_STYLE) {
                span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "New to Finboard? "
                a href=(endpoints::REGISTER_VIEW) class=(LINK_STYLE) { "Create an account" }
            }
        }
    }
}

/// Drop redirect targets that point off-site, logging where they came from.
fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let raw_url = raw_url?;
    let redirect_url = normalize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("ignoring invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let form = log_in_form("", None, redirect_url.as_deref());

    base("Log In", &[], &auth_card("Log in to Finboard", &form)).into_response()
}

fn verify_credentials(
    state: &SessionState,
    email: &str,
    password: &str,
) -> Result<UserID, LogInFailure> {
    let user = {
        let connection =
            lock_connection(&state.db_connection).map_err(|_| LogInFailure::Internal)?;

        get_user_by_email(email, &connection)
    };

    let user = match user {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(LogInFailure::InvalidCredentials),
        Err(error) => {
            tracing::error!("could not look up user during log-in: {error}");
            return Err(LogInFailure::Internal);
        }
    };

    match user.password_hash.verify(password) {
        Ok(true) => Ok(user.id),
        Ok(false) => Err(LogInFailure::InvalidCredentials),
        Err(error) => {
            tracing::error!("could not verify password for user {}: {error}", user.id);
            Err(LogInFailure::Internal)
        }
    }
}

/// Check the submitted credentials and, if they match, set the auth cookie
/// and redirect to `redirect_url` or the reports page.
///
/// Failed attempts get the form back with an error message.
pub async fn post_log_in(
    State(state): State<SessionState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(form.redirect_url.as_deref(), "log-in form");

    let user_id = match verify_credentials(&state, &form.email, &form.password) {
        Ok(user_id) => user_id,
        Err(failure) => {
            return log_in_form(&form.email, Some(failure.message()), redirect_url.as_deref())
                .into_response();
        }
    };

    let cookie_duration = match form.remember_me {
        Some(_) => REMEMBER_ME_COOKIE_DURATION,
        None => state.cookie_duration,
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    match set_auth_cookie(jar.clone(), user_id, cookie_duration, local_offset) {
        Ok(jar) => {
            tracing::info!("user {user_id} logged in");
            let target = redirect_url.unwrap_or_else(|| endpoints::REPORTS_VIEW.to_owned());

            (StatusCode::SEE_OTHER, HxRedirect(target), jar).into_response()
        }
        Err(error) => {
            tracing::error!("could not set auth cookie: {error}");

            (invalidate_auth_cookie(jar), get_internal_server_error_redirect()).into_response()
        }
    }
}
