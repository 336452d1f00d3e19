//! Remembering where a user was headed when they were sent to log in.

use axum::http::{HeaderMap, Uri, request::Parts};

use crate::endpoints;

/// Paths under this prefix are htmx endpoints rather than pages.
const HTMX_PREFIX: &str = "/api";

/// The path and query of `raw_url` if it stays on this site.
///
/// `allow_origin` permits a scheme and host, which is the form htmx sends in
/// `HX-Current-URL`. The log-in page itself is never a valid target.
fn local_target(raw_url: &str, allow_origin: bool) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if !allow_origin && (uri.scheme().is_some() || uri.authority().is_some()) {
        return None;
    }

    let target = uri.path_and_query()?;
    let is_local = target.as_str().starts_with('/') && !target.as_str().starts_with("//");

    (is_local && target.path() != endpoints::LOG_IN_VIEW).then(|| target.as_str().to_owned())
}

/// Reduce a user supplied redirect URL to a same-site path and query.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    local_target(raw_url, false)
}

/// The log-in page URL that returns the user to `target` afterwards.
pub(super) fn build_log_in_redirect_url_from_target(target: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", target)])
        .inspect_err(|error| tracing::error!("could not encode redirect URL {target}: {error}"))
        .ok()
        .map(|query| format!("{}?{query}", endpoints::LOG_IN_VIEW))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// htmx requests come from a page, and that page is where the user should
/// land after logging in.
fn current_page_of_htmx_request(headers: &HeaderMap) -> Option<String> {
    let is_htmx = header(headers, "hx-request").is_some_and(|value| value.eq_ignore_ascii_case("true"));
    if !is_htmx {
        tracing::warn!("request to an htmx endpoint is missing HX-Request");
        return None;
    }

    let Some(current_url) = header(headers, "hx-current-url") else {
        tracing::warn!("htmx request is missing HX-Current-URL");
        return None;
    };

    let target = local_target(current_url, true);
    if target.is_none() {
        tracing::warn!("ignoring HX-Current-URL {current_url}");
    }

    target
}

/// Build the log-in URL for a rejected request, pointing back at the page
/// the user was on.
pub fn build_log_in_redirect_url(parts: &Parts) -> Option<String> {
    let target = if parts.uri.path().starts_with(HTMX_PREFIX) {
        current_page_of_htmx_request(&parts.headers)?
    } else {
        normalize_redirect_url(parts.uri.path_and_query()?.as_str())?
    };

    build_log_in_redirect_url_from_target(&target)
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, request::Parts};

    use crate::endpoints;

    use super::{build_log_in_redirect_url, normalize_redirect_url};

    fn parts(request: axum::http::request::Builder) -> Parts {
        request.body(()).unwrap().into_parts().0
    }

    #[test]
    fn keeps_same_site_paths() {
        assert_eq!(
            normalize_redirect_url("/reports?report=category"),
            Some("/reports?report=category".to_owned())
        );
    }

    #[test]
    fn rejects_other_sites_and_log_in_page() {
        assert_eq!(normalize_redirect_url("https://example.com/reports"), None);
        assert_eq!(normalize_redirect_url("//example.com/reports"), None);
        assert_eq!(normalize_redirect_url(endpoints::LOG_IN_VIEW), None);
        assert_eq!(normalize_redirect_url("/log_in?redirect_url=%2F"), None);
    }

    #[test]
    fn page_request_redirects_back_to_itself() {
        let parts = parts(Request::get("/transactions?page=2"));

        assert_eq!(
            build_log_in_redirect_url(&parts),
            Some("/log_in?redirect_url=%2Ftransactions%3Fpage%3D2".to_owned())
        );
    }

    #[test]
    fn htmx_request_redirects_back_to_current_page() {
        let parts = parts(
            Request::get("/api/reports/content")
                .header("HX-Request", "true")
                .header("HX-Current-URL", "http://localhost:3000/reports?report=totals"),
        );

        assert_eq!(
            build_log_in_redirect_url(&parts),
            Some("/log_in?redirect_url=%2Freports%3Freport%3Dtotals".to_owned())
        );
    }

    #[test]
    fn htmx_endpoint_without_headers_has_no_target() {
        let parts = parts(Request::get("/api/reports/content"));

        assert_eq!(build_log_in_redirect_url(&parts), None);
    }
}
