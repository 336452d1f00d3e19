use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

async fn into_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    String::from_utf8(bytes.to_vec()).expect("Response body is not UTF-8")
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&into_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&into_text(response).await)
}

/// Fail on any markup the HTML parser had to recover from.
#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(html.errors.is_empty(), "HTML has parse errors: {:?}", html.errors);
}

/// The trimmed text of every element matching `selector`.
#[track_caller]
pub(crate) fn select_text(html: &Html, selector: &str) -> Vec<String> {
    let selector = Selector::parse(selector).expect("Invalid selector");

    html.select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_owned())
        .collect()
}
