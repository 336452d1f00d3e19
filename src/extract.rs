//! Request extractors for the JSON API.
//!
//! They wrap axum's own extractors so a body, query string or path that
//! fails to parse is answered with a [JsonError] and status 400, like any
//! other validation failure.

use axum::extract::{
    FromRequest, FromRequestParts,
    rejection::{JsonRejection, PathRejection},
};
use axum_extra::extract::QueryRejection;

use crate::{JsonError, ValidationError};

/// [axum::Json] for request bodies.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(JsonError))]
pub struct ApiJson<T>(pub T);

/// [axum_extra::extract::Query], where an empty value reads as `None`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(JsonError))]
pub struct ApiQuery<T>(pub T);

/// [axum::extract::Path] for IDs in the URL.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(JsonError))]
pub struct ApiPath<T>(pub T);

fn malformed(description: String) -> JsonError {
    ValidationError::MalformedRequest(description).into()
}

impl From<JsonRejection> for JsonError {
    fn from(rejection: JsonRejection) -> Self {
        malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for JsonError {
    fn from(rejection: QueryRejection) -> Self {
        malformed(rejection.body_text())
    }
}

impl From<PathRejection> for JsonError {
    fn from(rejection: PathRejection) -> Self {
        malformed(rejection.body_text())
    }
}
