//! Alert messages that are swapped into the page's alert container by htmx.

use axum::response::Html;
use maud::{Markup, html};

/// A dismissable success or error message.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    Error { message: String, details: String },
}

const SUCCESS_STYLE: &str = "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
    dark:bg-gray-800 dark:text-green-400 border border-green-300 dark:border-green-800";
const ERROR_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
    dark:bg-gray-800 dark:text-red-400 border border-red-300 dark:border-red-800";

impl Alert {
    /// Render the alert as an out-of-band swap into `#alert-container`.
    pub fn into_markup(self) -> Markup {
        let (style, message, details) = match &self {
            Alert::Success { message, details } => (SUCCESS_STYLE, message, details),
            Alert::Error { message, details } => (ERROR_STYLE, message, details),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(style) role="alert"
                {
                    div class="flex items-center justify-between"
                    {
                        span class="font-medium" { (message) }

                        button
                            type="button"
                            class="ms-2 font-bold"
                            aria-label="Dismiss"
                            onclick="this.closest('[role=alert]').remove()"
                        {
                            "×"
                        }
                    }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }
            }
        }
    }

    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }
}
