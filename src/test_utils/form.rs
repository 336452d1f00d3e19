use scraper::{ElementRef, Html, Selector};

#[track_caller]
fn select_first<'a>(element: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).expect("Invalid selector");
    element.select(&selector).next()
}

/// The first form in `html`.
#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    select_first(html.root_element(), "form").expect("No form found")
}

/// Assert `form` submits to `endpoint` through the htmx attribute `attribute`,
/// e.g. `hx-post`.
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    assert_eq!(
        form.value().attr(attribute),
        Some(endpoint),
        "want form with {attribute}=\"{endpoint}\""
    );
}

/// Assert the form has an input or select named `name`. Inputs must also be
/// of type `type_`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let field = select_first(
        *form,
        &format!("input[name=\"{name}\"], select[name=\"{name}\"]"),
    )
    .unwrap_or_else(|| panic!("No field named {name:?}"));

    if field.value().name() == "input" {
        assert_eq!(
            field.value().attr("type"),
            Some(type_),
            "want input {name:?} of type {type_:?}"
        );
    }
}

/// Assert the first error message shown in `form` reads `want`.
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want: &str) {
    let message = select_first(*form, "p.text-red-500").expect("No error message found");

    assert_eq!(message.text().collect::<String>().trim(), want);
}
