//! The app's error type and how it is shown to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{alert::Alert, error_page::ErrorPage, transaction::MAX_AMOUNT};

/// Input that was rejected before it reached the database.
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ValidationError {
    /// Transaction amounts must be finite and greater than zero.
    #[error("amount must be a positive number, got {0}")]
    NonPositiveAmount(f64),

    /// The transaction type was not one of "income" or "expense".
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// The page size was outside of the allowed range.
    #[error("limit must be between 1 and 100, got {0}")]
    LimitOutOfRange(i64),

    /// The page offset was negative.
    #[error("offset must not be negative, got {0}")]
    NegativeOffset(i64),

    /// Transaction amounts are capped so that sums stay exact to the cent.
    #[error("amount must be at most {max}, got {0}", max = MAX_AMOUNT)]
    AmountTooLarge(f64),

    /// The request body, query string or path could not be parsed. Holds
    /// the extractor's description of the problem.
    #[error("{0}")]
    MalformedRequest(String),
}

/// Everything that can go wrong while handling a request.
///
/// Handlers return this and pick how it reaches the client: as a full
/// [ErrorPage], an alert fragment via [Error::into_alert_response], or JSON
/// via [JsonError]. Internal details are logged, never shown.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// See [ValidationError].
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No valid session came with the request.
    #[error("the request is not authenticated")]
    Unauthenticated,

    /// Unknown email, wrong password, or an auth cookie that failed to parse
    /// or has expired.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request has no auth cookie at all.
    #[error("no auth cookie in the request")]
    CookieMissing,

    /// An auth cookie expiry (second field) could not be formatted or parsed.
    /// The first field is the underlying error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// Carries zxcvbn's suggestions for a better password.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// bcrypt failed. The message is for the server log only.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// Emails are unique, ignoring case.
    #[error("the email \"{0}\" is already registered")]
    DuplicateEmail(String),

    /// The row does not exist or belongs to another user. The two cases are
    /// indistinguishable to the caller.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Any other database failure.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The configured timezone is not a canonical IANA name.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The database mutex was poisoned by a panicking request.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        if matches!(error, rusqlite::Error::QueryReturnedNoRows) {
            return Error::NotFound;
        }

        tracing::error!("unhandled SQL error: {error}");
        Error::SqlError(error)
    }
}

const INVALID_TIMEZONE_TITLE: &str = "Invalid Timezone Settings";

fn invalid_timezone_fix(timezone: &str) -> String {
    format!(
        "The server timezone \"{timezone}\" is not recognised. Restart the server with a \
        canonical timezone name such as \"Pacific/Auckland\"."
    )
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => ErrorPage::not_found().into_response(),
            Error::Validation(error) => ErrorPage::bad_request(&error.to_string()).into_response(),
            Error::InvalidTimezoneError(timezone) => ErrorPage {
                description: INVALID_TIMEZONE_TITLE,
                fix: &invalid_timezone_fix(&timezone),
                ..ErrorPage::internal_error()
            }
            .into_response(),
            error => {
                if error != Error::DatabaseLockError {
                    tracing::error!("unexpected error while rendering a page: {error}");
                }
                ErrorPage::internal_error().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert(self) -> (StatusCode, Alert) {
        let (status, message, details) = match self {
            Error::Validation(error) => (
                StatusCode::BAD_REQUEST,
                "Invalid input",
                capitalise_first_char(&error.to_string()),
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INVALID_TIMEZONE_TITLE,
                invalid_timezone_fix(&timezone),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                "Not found",
                "The transaction could not be found. It may have been deleted, try refreshing \
                the page."
                    .to_owned(),
            ),
            error => {
                tracing::error!("unexpected error while handling an htmx request: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for details.".to_owned(),
                )
            }
        };

        let alert = Alert::Error {
            message: message.to_owned(),
            details,
        };

        (status, alert)
    }

    /// Render the error as an alert for `#alert-container`, for htmx requests.
    pub fn into_alert_response(self) -> Response {
        let (status, alert) = self.into_alert();

        (status, alert.into_html()).into_response()
    }
}

/// The body of an error response from the JSON API.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// An [Error] that is rendered as JSON rather than an HTML page.
#[derive(Debug, PartialEq)]
pub struct JsonError(pub Error);

impl From<Error> for JsonError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl From<ValidationError> for JsonError {
    fn from(error: ValidationError) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status_code = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            error => {
                tracing::error!("unexpected error in the JSON API: {error}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = if status_code.is_server_error() {
            "an unexpected error occurred".to_owned()
        } else {
            self.0.to_string()
        };

        (status_code, Json(ErrorBody { error: message })).into_response()
    }
}

fn capitalise_first_char(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
