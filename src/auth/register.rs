//! Account registration.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error, PasswordHash, ValidatedPassword,
    auth::{SessionState, set_auth_cookie},
    db::lock_connection,
    endpoints,
    error_page::get_internal_server_error_redirect,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, auth_card,
        base, email_input, loading_spinner, password_input,
    },
    timezone::get_local_offset,
    user::create_user,
};

/// Browsers enforce this before submitting. The server applies its own
/// strength check on top.
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

const DUPLICATE_EMAIL_MSG: &str = "An account with this email already exists, please log in";

/// The fields of the registration form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// A problem with one field of the registration form.
enum FieldError {
    Email(String),
    Password(String),
    ConfirmPassword(String),
}

impl FieldError {
    fn on_email(&self) -> Option<&str> {
        match self {
            FieldError::Email(message) => Some(message),
            _ => None,
        }
    }

    fn on_password(&self) -> Option<&str> {
        match self {
            FieldError::Password(message) => Some(message),
            _ => None,
        }
    }

    fn on_confirm_password(&self) -> Option<&str> {
        match self {
            FieldError::ConfirmPassword(message) => Some(message),
            _ => None,
        }
    }
}

fn registration_form(email: &str, password: &str, error: Option<&FieldError>) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #confirm-password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, error.and_then(FieldError::on_email)))
            (password_input(password, PASSWORD_INPUT_MIN_LENGTH, error.and_then(FieldError::on_password)))

            div {
                label for="confirm-password" class=(FORM_LABEL_STYLE) { "Confirm Password" }
                input
                    id="confirm-password"
                    name="confirm_password"
                    type="password"
                    minlength=(PASSWORD_INPUT_MIN_LENGTH)
                    placeholder="••••••••"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
                @if let Some(message) = error.and_then(FieldError::on_confirm_password) {
                    p class="text-base text-red-500" { (message) }
                }
            }

            button id="submit-button" type="submit" class=(BUTTON_PRIMARY_STYLE) {
                span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) class=(LINK_STYLE) { "Log in here" }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = registration_form("", "", None);

    base("Register", &[], &auth_card("Create Account", &form)).into_response()
}

/// Check the form fields in the order they appear on the page.
fn validate(email: &str, form: &RegisterForm) -> Result<ValidatedPassword, FieldError> {
    if !email.contains('@') {
        return Err(FieldError::Email("Enter a valid email address".to_owned()));
    }

    let password = ValidatedPassword::new(&form.password)
        .map_err(|error| FieldError::Password(error.to_string()))?;

    if form.password != form.confirm_password {
        return Err(FieldError::ConfirmPassword(
            "Passwords do not match".to_owned(),
        ));
    }

    Ok(password)
}

/// Create a new account and log the new user in.
///
/// Problems with the submitted fields re-render the form with a message
/// under the offending field. On success the client is sent to the reports
/// page.
pub async fn register_user(
    State(state): State<SessionState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let email = form.email.trim();
    let form_with_error =
        |error: FieldError| registration_form(email, &form.password, Some(&error)).into_response();

    let password = match validate(email, &form) {
        Ok(password) => password,
        Err(error) => return form_with_error(error),
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let password_hash = match PasswordHash::new(password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("could not hash password during registration: {error}");
            return get_internal_server_error_redirect();
        }
    };

    let user = lock_connection(&state.db_connection)
        .and_then(|connection| create_user(email, password_hash, &connection));

    let user = match user {
        Ok(user) => user,
        Err(Error::DuplicateEmail(_)) => {
            return form_with_error(FieldError::Email(DUPLICATE_EMAIL_MSG.to_owned()));
        }
        Err(error) => {
            tracing::error!("could not create user: {error}");
            return get_internal_server_error_redirect();
        }
    };

    tracing::info!("registered user {}", user.id);

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::REPORTS_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not set auth cookie for new user {}: {error}", user.id);
            get_internal_server_error_redirect()
        }
    }
}
