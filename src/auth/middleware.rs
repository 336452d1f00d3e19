//! Route guards that require a valid auth cookie.
//!
//! All three guards share the same check and differ only in how they turn an
//! anonymous request away: full pages redirect to the log-in page, htmx
//! requests get an `HX-Redirect`, and the JSON API answers 401.
//!
//! On success the user's ID is inserted as a request extension, so handlers
//! can take `Extension(user_id): Extension<UserID>`. The auth cookie is also
//! refreshed when it is close to expiring.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::{Duration, UtcOffset};

use crate::{
    AppState, Error, JsonError,
    auth::{
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        redirect::{build_log_in_redirect_url, build_log_in_redirect_url_from_target},
    },
    endpoints,
    timezone::get_local_offset,
};

#[derive(Clone)]
pub struct AuthState {
    pub cookie_key: Key,
    /// How far a refreshed auth cookie's expiry is pushed out.
    pub cookie_duration: Duration,
    pub local_timezone: String,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Clone, Copy)]
enum Rejection {
    Redirect,
    HxRedirect,
    Json,
}

impl Rejection {
    fn respond(self, parts: &Parts) -> Response {
        match self {
            Rejection::Redirect => Redirect::to(&log_in_redirect_url(parts)).into_response(),
            Rejection::HxRedirect => {
                (HxRedirect(log_in_redirect_url(parts)), StatusCode::OK).into_response()
            }
            Rejection::Json => JsonError(Error::Unauthenticated).into_response(),
        }
    }
}

/// The log-in page URL, carrying the page the user was trying to reach.
fn log_in_redirect_url(parts: &Parts) -> String {
    if let Some(url) = build_log_in_redirect_url(parts) {
        return url;
    }

    if parts.uri.path().starts_with("/api") {
        tracing::warn!("htmx request has no usable HX-Current-URL, falling back to reports");
    } else {
        tracing::warn!("no valid redirect URL for {}, falling back to reports", parts.uri);
    }

    build_log_in_redirect_url_from_target(endpoints::REPORTS_VIEW)
        .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned())
}

async fn guard(state: AuthState, request: Request, next: Next, rejection: Rejection) -> Response {
    let (mut parts, body) = request.into_parts();

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("invalid timezone \"{}\", rejecting request", state.local_timezone);
        return rejection.respond(&parts);
    };

    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("could not read cookie jar: {error:?}");
            return rejection.respond(&parts);
        }
    };

    let Ok(token) = get_token_from_cookies(&jar) else {
        return rejection.respond(&parts);
    };

    parts.extensions.insert(token.user_id);
    let response = next.run(Request::from_parts(parts, body)).await;

    refresh_cookie(response, jar, state.cookie_duration, local_offset)
}

/// Copy the `Set-Cookie` headers of a refreshed auth cookie onto `response`.
fn refresh_cookie(
    mut response: Response,
    jar: PrivateCookieJar,
    cookie_duration: Duration,
    local_offset: UtcOffset,
) -> Response {
    let jar = extend_auth_cookie_duration_if_needed(jar.clone(), cookie_duration, local_offset)
        .unwrap_or_else(|error| {
            tracing::error!("could not extend auth cookie: {error:?}");
            jar
        });

    let jar_response = jar.into_response();
    for value in jar_response.headers().get_all(SET_COOKIE) {
        response.headers_mut().append(SET_COOKIE, value.clone());
    }

    response
}

/// Guard for full page routes. Anonymous requests are redirected to the
/// log-in page.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    guard(state, request, next, Rejection::Redirect).await
}

/// Guard for htmx endpoints. Anonymous requests get a 200 with `HX-Redirect`
/// pointing at the log-in page, so htmx navigates the whole page.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard(state, request, next, Rejection::HxRedirect).await
}

/// Guard for the JSON API. Anonymous requests get a 401 JSON error.
pub async fn auth_guard_json(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard(state, request, next, Rejection::Json).await
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Router,
        extract::State,
        http::StatusCode,
        middleware::from_fn_with_state,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, SameSite},
    };
    use axum_test::TestServer;
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error, UserID,
        app_state::create_cookie_key,
        auth::cookie::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, set_auth_cookie},
        endpoints,
    };

    use super::{AuthState, auth_guard, auth_guard_hx, auth_guard_json};

    const LOG_IN_ROUTE: &str = "/test-log-in";
    const PAGE_ROUTE: &str = "/page";
    const FRAGMENT_ROUTE: &str = "/api/fragment";
    const JSON_ROUTE: &str = "/api/v1/data";

    async fn whoami(Extension(user_id): Extension<UserID>) -> String {
        format!("user {user_id}")
    }

    async fn stub_log_in(
        State(state): State<AuthState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, UserID::new(7), state.cookie_duration, time::UtcOffset::UTC)
    }

    fn get_server(cookie_duration: Duration) -> TestServer {
        let state = AuthState {
            cookie_key: create_cookie_key("middleware tests"),
            cookie_duration,
            local_timezone: "Etc/UTC".to_owned(),
        };

        let pages = Router::new()
            .route(PAGE_ROUTE, get(whoami))
            .route_layer(from_fn_with_state(state.clone(), auth_guard));
        let fragments = Router::new()
            .route(FRAGMENT_ROUTE, get(whoami))
            .route_layer(from_fn_with_state(state.clone(), auth_guard_hx));
        let json = Router::new()
            .route(JSON_ROUTE, get(whoami))
            .route_layer(from_fn_with_state(state.clone(), auth_guard_json));

        let app = Router::new()
            .merge(pages)
            .merge(fragments)
            .merge(json)
            .route(LOG_IN_ROUTE, post(stub_log_in))
            .with_state(state);

        TestServer::new(app)
    }

    fn log_in_location(target: &str) -> String {
        let query = serde_urlencoded::to_string([("redirect_url", target)]).unwrap();
        format!("{}?{query}", endpoints::LOG_IN_VIEW)
    }

    #[tokio::test]
    async fn valid_cookie_passes_user_id_to_handler() {
        let server = get_server(DEFAULT_COOKIE_DURATION);
        let cookie = server.post(LOG_IN_ROUTE).await.cookie(COOKIE_TOKEN);

        for route in [PAGE_ROUTE, FRAGMENT_ROUTE, JSON_ROUTE] {
            let response = server.get(route).add_cookie(cookie.clone()).await;

            response.assert_status_ok();
            response.assert_text("user 7");
        }
    }

    #[tokio::test]
    async fn cookie_is_refreshed_on_each_request() {
        let cookies = get_server(Duration::seconds(5))
            .post(LOG_IN_ROUTE)
            .await
            .cookies();

        let response = get_server(Duration::minutes(5))
            .get(PAGE_ROUTE)
            .add_cookies(cookies)
            .await;

        let cookie = response.cookie(COOKIE_TOKEN);
        let want = OffsetDateTime::now_utc() + Duration::minutes(5);
        let expires = cookie.expires_datetime().unwrap();
        assert!(
            (expires - want).abs() < Duration::seconds(1),
            "got expiry {expires:?}, want {want:?}"
        );
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn page_without_cookie_redirects_to_log_in() {
        let response = get_server(DEFAULT_COOKIE_DURATION).get(PAGE_ROUTE).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), log_in_location(PAGE_ROUTE));
    }

    #[tokio::test]
    async fn page_with_garbage_cookie_redirects_to_log_in() {
        let response = get_server(DEFAULT_COOKIE_DURATION)
            .get(PAGE_ROUTE)
            .add_cookie(Cookie::new(COOKIE_TOKEN, "FOOBAR"))
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), log_in_location(PAGE_ROUTE));
    }

    #[tokio::test]
    async fn fragment_redirect_returns_to_current_page() {
        let current_url = "/transactions?page=2&per_page=20";

        let response = get_server(DEFAULT_COOKIE_DURATION)
            .get(FRAGMENT_ROUTE)
            .add_header("HX-Request", "true")
            .add_header("HX-Current-URL", current_url)
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), log_in_location(current_url));
    }

    #[tokio::test]
    async fn fragment_redirect_without_htmx_headers_returns_to_reports() {
        let response = get_server(DEFAULT_COOKIE_DURATION).get(FRAGMENT_ROUTE).await;

        assert_eq!(
            response.header("hx-redirect"),
            log_in_location(endpoints::REPORTS_VIEW)
        );
    }

    #[tokio::test]
    async fn json_without_cookie_is_unauthorized() {
        let response = get_server(DEFAULT_COOKIE_DURATION).get(JSON_ROUTE).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&serde_json::json!({
            "error": "the request is not authenticated"
        }));
    }
}
