//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Form fields whose values never appear in the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the request or response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let is_form = parts.headers.get(CONTENT_TYPE)
        == Some(&HeaderValue::from_static(
            "application/x-www-form-urlencoded",
        ));
    if is_form {
        log_request(&parts, &redact_form_fields(&body_text));
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn body_to_text(body: Body) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

fn redact_form_fields(form_text: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if REDACTED_FIELDS.contains(&name) => format!("{name}=********"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The maximum number of characters of a request or response body logged at `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(LOG_BODY_LENGTH_LIMIT) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            truncate(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            truncate(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, middleware, routing::post};
    use axum_test::TestServer;

    use super::{logging_middleware, redact_form_fields, truncate};

    #[test]
    fn redacts_passwords_in_any_order() {
        let form = "confirm_password=hunter2&email=a%40b.com&password=hunter2";

        assert_eq!(
            redact_form_fields(form),
            "confirm_password=********&email=a%40b.com&password=********"
        );
    }

    #[test]
    fn leaves_other_fields_alone() {
        assert_eq!(redact_form_fields("amount=12.5&type=expense"), "amount=12.5&type=expense");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(100);

        assert_eq!(truncate(&body).chars().count(), 64);
    }

    #[tokio::test]
    async fn passes_body_through() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);

        let response = server.post("/echo").text("hello").await;

        response.assert_status_ok();
        response.assert_text("hello");
    }
}
