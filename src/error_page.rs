//! Full-page responses for requests that fail outside of htmx, e.g. an unknown
//! URL typed into the address bar.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{endpoints, html::error_view};

/// An error page: a status code plus what went wrong and what the user can
/// do about it.
pub struct ErrorPage<'a> {
    pub status: StatusCode,
    pub description: &'a str,
    pub fix: &'a str,
}

impl<'a> ErrorPage<'a> {
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            description: "Something's missing.",
            fix: "We couldn't find that page. Your reports and transactions are still where you left them.",
        }
    }

    pub fn internal_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs.",
        }
    }

    pub fn bad_request(fix: &'a str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            description: "Invalid Request",
            fix,
        }
    }

    fn into_html(self) -> Html<String> {
        let title = self.status.canonical_reason().unwrap_or("Error");

        Html(error_view(title, self.status.as_str(), self.description, self.fix).into_string())
    }
}

impl IntoResponse for ErrorPage<'_> {
    fn into_response(self) -> Response {
        (self.status, self.into_html()).into_response()
    }
}

/// Fallback handler for unknown routes.
pub async fn get_404_not_found() -> Response {
    ErrorPage::not_found().into_response()
}

pub async fn get_internal_server_error_page() -> Response {
    ErrorPage::internal_error().into_response()
}

/// Send an htmx client to the 500 page.
pub fn get_internal_server_error_redirect() -> Response {
    (
        HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
        .into_response()
}
