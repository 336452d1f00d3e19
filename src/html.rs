//! The page shell, shared Tailwind class lists and money formatting used by
//! every maud view.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

use crate::endpoints;

/// Inline text links.
pub const LINK_STYLE: &str = "underline text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400";

/// Full width call-to-action button, e.g. form submits.
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 rounded text-white \
    bg-blue-500 dark:bg-blue-600 disabled:bg-blue-700 \
    hover:enabled:bg-blue-600 hover:enabled:dark:bg-blue-700";

/// Outlined button for secondary actions such as export.
pub const BUTTON_SECONDARY_STYLE: &str = "w-full px-5 py-2.5 mb-2 rounded border \
    text-sm font-medium text-gray-900 bg-white border-gray-200 \
    hover:bg-gray-100 hover:text-blue-700 dark:text-gray-400 dark:bg-gray-800 \
    dark:border-gray-600 dark:hover:text-white dark:hover:bg-gray-700";

/// Destructive actions are rendered as red text buttons.
pub const BUTTON_DELETE_STYLE: &str = "bg-transparent border-none cursor-pointer \
    underline text-red-600 hover:text-red-500 dark:text-red-500 dark:hover:text-red-400";

pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center max-w-md mx-auto \
    px-6 py-8 lg:py-0 text-gray-900 dark:text-white";

pub const FORM_LABEL_STYLE: &str =
    "block mb-2 text-sm font-medium text-gray-900 dark:text-white";

pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 text-sm rounded border \
    text-gray-900 bg-gray-50 border-gray-300 disabled:text-gray-500 \
    dark:text-white dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 \
    focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:ring-blue-500 focus:dark:border-blue-500";

/// Wraps the income/expense choice on the transaction forms.
pub const FORM_RADIO_GROUP_STYLE: &str = "flex flex-col gap-2";

/// The radio itself. Its label is styled off `peer-checked`.
pub const FORM_RADIO_INPUT_STYLE: &str = "peer h-4 w-4 shrink-0 cursor-pointer \
    text-blue-600 border-gray-300 dark:border-gray-600 \
    focus-visible:ring-2 focus-visible:ring-blue-500 focus-visible:ring-offset-2";

pub const FORM_RADIO_LABEL_STYLE: &str = "flex-1 px-3 py-2 rounded border cursor-pointer \
    text-sm font-medium text-gray-700 bg-white border-gray-300 \
    dark:text-white dark:bg-gray-700 dark:border-gray-600 \
    hover:bg-gray-50 hover:border-gray-400 hover:dark:bg-gray-600 \
    peer-checked:text-blue-700 peer-checked:bg-blue-50 peer-checked:border-blue-600 \
    peer-checked:dark:text-blue-200 peer-checked:dark:bg-blue-600/20";

pub const TABLE_HEADER_STYLE: &str =
    "text-xs uppercase text-gray-700 bg-gray-50 dark:text-gray-400 dark:bg-gray-700";

pub const TABLE_ROW_STYLE: &str = "border-b bg-white dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

/// Income amounts and positive net totals.
pub const AMOUNT_POSITIVE_STYLE: &str = "text-green-600 dark:text-green-400";
/// Expense amounts and negative net totals.
pub const AMOUNT_NEGATIVE_STYLE: &str = "text-red-600 dark:text-red-400";

/// The panel each report and summary figure sits in.
pub const CARD_STYLE: &str = "w-full p-6 rounded-lg border shadow \
    bg-white border-gray-200 dark:bg-gray-800 dark:border-gray-700";

pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center mx-auto px-6 py-8 lg:py-5 text-gray-900 dark:text-white";

/// Extra markup a page adds to the `<head>` of [base].
pub enum HeadElement {
    /// Path or URL of a script to load.
    ScriptLink(String),
    /// Inline CSS.
    Style(PreEscaped<String>),
}

/// Hides the `#indicator` spinner until htmx marks a request in flight.
const INDICATOR_CSS: &str = "#indicator.htmx-indicator { display: none; }
#indicator.htmx-request .htmx-indicator,
#indicator.htmx-request.htmx-indicator { display: inline; }";

const ALERT_CONTAINER_POSITION: &str =
    "position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;";

/// Wrap `content` in the full HTML document shared by every page.
///
/// The body always ends with `#alert-container`, the target that alert
/// fragments are swapped into.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Finboard" }
                link rel="icon" type="image/png" href="/static/favicon-32x32.png" sizes="32x32";
                link rel="icon" type="image/png" href="/static/favicon-128x128.png" sizes="128x128";
                link rel="stylesheet" href="/static/main.css";
                script src="/static/htmx-2.0.8-min.js" integrity="sha384-/TgkGk7p307TH7EXJDuUlgG3Ce1UVolAOFopFekQkkXihi5u/6OCvVKyz1W+idaz" {}
                script src="/static/htmx-ext-response-targets-2.0.4.js" integrity="sha384-T41oglUPvXLGBVyRdZsVRxNWnOOqCynaPubjUVjxhsjFTKrFJGEMm3/0KGmNQ+Pg" {}
                style { (PreEscaped(INDICATOR_CSS)) }

                @for element in head_elements {
                    @match element {
                        HeadElement::ScriptLink(path) => script src=(path) {}
                        HeadElement::Style(css) => style { (css) }
                    }
                }

                script src="/static/app.js" defer {}
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900 \
                    pb-[calc(5rem+env(safe-area-inset-bottom))] lg:pb-0"
            {
                (content)

                div id="alert-container" class="hidden w-full max-w-md px-4" style=(ALERT_CONTAINER_POSITION) {}
            }
        }
    }
}

/// A full page explaining an HTTP error, e.g. a 404, with a link back to the
/// reports page.
pub fn error_view(title: &str, status_code: &str, description: &str, fix: &str) -> Markup {
    let content = html! {
        main class="bg-white dark:bg-gray-900" {
            div class="max-w-screen-sm mx-auto px-4 py-8 lg:py-16 text-center text-gray-900 dark:text-white" {
                h1 class="mb-4 text-7xl lg:text-9xl font-extrabold tracking-tight text-blue-600 dark:text-blue-500" {
                    (status_code)
                }
                p class="mb-4 text-3xl md:text-4xl font-bold tracking-tight" { (description) }
                p class="mb-4 text-xl md:text-2xl tracking-tight" { (fix) }
                a
                    href=(endpoints::REPORTS_VIEW)
                    class="inline-flex my-4 px-5 py-2.5 rounded text-sm font-medium text-white \
                        bg-blue-600 hover:bg-blue-800"
                {
                    "Back to Reports"
                }
            }
        }
    };

    base(title, &[], &content)
}

/// The centred, branded card that holds the log-in and registration forms.
pub fn auth_card(heading: &str, form: &Markup) -> Markup {
    html! {
        div class="flex flex-col items-center justify-center mx-auto px-6 py-8" {
            div class="flex items-center mb-6 text-2xl font-semibold text-gray-900 dark:text-white" {
                img class="w-8 h-8 mr-2" src="/static/favicon-128x128.png" alt="Finboard logo";
                "Finboard"
            }

            div class="w-full sm:max-w-md rounded-lg shadow bg-white dark:bg-gray-800 dark:border dark:border-gray-700" {
                div class="p-6 sm:p-8 space-y-4 md:space-y-6" {
                    h1 class="text-xl md:text-2xl font-bold leading-tight tracking-tight text-gray-900 dark:text-white" {
                        (heading)
                    }
                    (form)
                }
            }
        }
    }
}

fn field_error(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p class="text-base text-red-500" { (message) }
        }
    }
}

/// The email field of the auth forms. It takes focus on page load.
pub fn email_input(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        div {
            label for="email" class=(FORM_LABEL_STYLE) { "Email" }
            input
                id="email"
                name="email"
                type="email"
                value=(email)
                placeholder="you@example.com"
                class=(FORM_TEXT_INPUT_STYLE)
                autofocus
                required;
            (field_error(error_message))
        }
    }
}

pub fn password_input(password: &str, min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div {
            label for="password" class=(FORM_LABEL_STYLE) { "Password" }
            input
                id="password"
                name="password"
                type="password"
                value=(password)
                minlength=(min_length)
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required;
            (field_error(error_message))
        }
    }
}

/// A small spinning ring shown inside submit buttons while htmx waits on
/// the server.
pub fn loading_spinner() -> Markup {
    html! {
        span
            role="status"
            aria-hidden="true"
            class="inline-block w-4 h-4 me-2 align-middle rounded-full border-2 \
                border-white border-t-transparent animate-spin"
        {}
    }
}

/// Draws a `$` inside `.input-wrapper` number inputs.
pub fn dollar_input_styles() -> HeadElement {
    const CSS: &str = r#"
        .input-wrapper { position: relative; display: inline-block; }
        .input-wrapper input[type="number"] { padding-left: 1.4rem; }
        .input-wrapper::before {
            content: '$';
            position: absolute;
            left: 0.6rem;
            top: 50%;
            transform: translateY(-50%);
            pointer-events: none;
        }
    "#;

    HeadElement::Style(PreEscaped(CSS.to_owned()))
}

fn dollar_formatter(cell: &'static OnceLock<Formatter>, decimals: u8) -> &'static Formatter {
    cell.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(decimals))
    })
}

fn with_sign(negative: bool, formatted: String) -> String {
    if negative {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// numfmt writes numbers at or above this magnitude in scientific notation.
const SCIENTIFIC_CUTOFF: f64 = 1e12;

/// Insert a comma between each group of three digits.
fn group_thousands(whole: u128) -> String {
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

/// Format a dollar amount with cents, e.g. `-$45.99` or `$12.30`.
pub fn format_currency(amount: f64) -> String {
    static CENTS: OnceLock<Formatter> = OnceLock::new();

    let amount = (amount * 100.0).round() / 100.0;

    if amount == 0.0 {
        return "$0.00".to_owned();
    }

    if amount.abs() >= SCIENTIFIC_CUTOFF {
        let cents = (amount.abs() * 100.0).round() as u128;
        let formatted = format!("${}.{:02}", group_thousands(cents / 100), cents % 100);
        return with_sign(amount < 0.0, formatted);
    }

    let mut formatted = dollar_formatter(&CENTS, 2).fmt_string(amount.abs());

    // numfmt drops trailing zeros from the cents.
    match formatted.rfind('.') {
        Some(point) if formatted.len() - point == 2 => formatted.push('0'),
        Some(_) => {}
        None => formatted.push_str(".00"),
    }

    with_sign(amount < 0.0, formatted)
}

/// Format a dollar amount rounded to the nearest whole dollar, e.g. `$80`.
pub fn format_currency_rounded(amount: f64) -> String {
    static WHOLE: OnceLock<Formatter> = OnceLock::new();

    let amount = amount.round();

    if amount == 0.0 {
        return "$0".to_owned();
    }

    let formatted = if amount.abs() >= SCIENTIFIC_CUTOFF {
        format!("${}", group_thousands(amount.abs() as u128))
    } else {
        dollar_formatter(&WHOLE, 0).fmt_string(amount.abs())
    };

    with_sign(amount < 0.0, formatted)
}

#[cfg(test)]
mod tests {
    use super::{format_currency, format_currency_rounded};

    #[test]
    fn formats_cents() {
        assert_eq!(format_currency(45.99), "$45.99");
        assert_eq!(format_currency(-45.99), "-$45.99");
        assert_eq!(format_currency(12.3), "$12.30");
        assert_eq!(format_currency(600.0), "$600.00");
    }

    #[test]
    fn zero_has_no_sign() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency_rounded(-0.2), "$0");
    }

    #[test]
    fn rounds_to_whole_dollars() {
        assert_eq!(format_currency_rounded(79.6), "$80");
        assert_eq!(format_currency_rounded(-12.4), "-$12");
    }

    #[test]
    fn large_amounts_stay_in_positional_notation() {
        assert_eq!(format_currency(1e16), "$10,000,000,000,000,000.00");
        assert_eq!(format_currency(-1_234_567_890_123.5), "-$1,234,567,890,123.50");
        assert_eq!(format_currency(1e12), "$1,000,000,000,000.00");
        assert_eq!(format_currency_rounded(1e12), "$1,000,000,000,000");
    }
}
