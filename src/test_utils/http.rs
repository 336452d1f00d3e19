use axum::{body::Body, response::Response};

/// The value of `name` on `response`, which must be present and valid UTF-8.
#[track_caller]
fn get_header(response: &Response<Body>, name: &str) -> String {
    let Some(value) = response.headers().get(name) else {
        panic!("response has no {name} header, got {:?}", response.headers());
    };

    value
        .to_str()
        .unwrap_or_else(|error| panic!("{name} header is not text: {error}"))
        .to_owned()
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    let location = get_header(response, "hx-redirect");

    assert_eq!(location, endpoint, "want HX-Redirect to {endpoint}");
}
