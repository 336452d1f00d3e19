//! The header bar shown on every page behind log-in.

use maud::{Markup, html};

use crate::endpoints;

/// Sections of the app, as (URL, title). A section is highlighted when the
/// current page is the section page or one below it.
const SECTIONS: [(&str, &str); 2] = [
    (endpoints::REPORTS_VIEW, "Reports"),
    (endpoints::TRANSACTIONS_VIEW, "Transactions"),
];

const LINK_STYLE: &str = "block py-2 px-3 md:p-0 rounded-sm text-gray-900 dark:text-white \
    hover:bg-gray-100 dark:hover:bg-gray-700 md:hover:bg-transparent \
    md:hover:text-blue-700 md:dark:hover:text-blue-500";

const CURRENT_LINK_STYLE: &str = "block py-2 px-3 md:p-0 rounded-sm text-white bg-blue-700 \
    md:bg-transparent md:text-blue-700 md:dark:text-blue-500";

fn is_in_section(section_url: &str, current_page: &str) -> bool {
    current_page
        .strip_prefix(section_url)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn nav_link(url: &str, title: &str, is_current: bool) -> Markup {
    html! {
        a
            href=(url)
            class=(if is_current { CURRENT_LINK_STYLE } else { LINK_STYLE })
            aria-current=[is_current.then_some("page")]
        { (title) }
    }
}

/// Render the navigation bar for `current_page`, an endpoint path such as
/// [endpoints::TRANSACTIONS_VIEW].
pub fn nav_bar(current_page: &str) -> Markup {
    html! {
        nav class="bg-white border-gray-200 dark:bg-gray-900" {
            div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4" {
                a href=(endpoints::ROOT) class="flex items-center gap-3" {
                    img src="/static/favicon-128x128.png" alt="Finboard logo" class="h-8";
                    span class="text-2xl font-semibold whitespace-nowrap dark:text-white" { "Finboard" }
                }

                ul class="w-full md:w-auto flex flex-col md:flex-row gap-2 md:gap-8 mt-4 md:mt-0 \
                    p-4 md:p-0 font-medium rounded border border-gray-100 md:border-0 \
                    bg-gray-50 md:bg-white dark:bg-gray-800 md:dark:bg-gray-900 dark:border-gray-700"
                {
                    @for (url, title) in SECTIONS {
                        li { (nav_link(url, title, is_in_section(url, current_page))) }
                    }
                    li { (nav_link(endpoints::LOG_OUT, "Log out", false)) }
                }
            }
        }
    }
}
