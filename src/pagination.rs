//! Page numbering for the transactions table.

use maud::{Markup, html};

use crate::html::LINK_STYLE;

/// Defaults for paging through transactions.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Used when a request does not give a page.
    pub default_page: u64,
    /// Used when a request does not give a page size.
    pub default_page_size: u64,
    /// How many numbered links to show around the current page.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_pages: 5,
        }
    }
}

/// One entry in the pagination bar.
#[derive(Debug, PartialEq, Eq)]
pub enum PageLink {
    Previous(u64),
    Page(u64),
    Current(u64),
    /// Stands in for the pages skipped between two links.
    Gap,
    Next(u64),
}

/// Number of pages needed to show `item_count` items, `page_size` at a time.
pub fn page_count(item_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }

    item_count.div_ceil(page_size)
}

/// Lay out the pagination bar for `current` out of `page_count` pages.
///
/// Up to `window` consecutive page numbers are shown, centred on `current`
/// where possible. The first and last pages are always reachable.
pub fn page_links(current: u64, page_count: u64, window: u64) -> Vec<PageLink> {
    let window = window.max(1);

    let start = current.saturating_sub(window / 2).max(1);
    let end = (start + window - 1).min(page_count);
    let start = end.saturating_sub(window - 1).max(1);

    let mut links = Vec::new();

    if current > 1 {
        links.push(PageLink::Previous(current - 1));
    }

    if start > 1 {
        links.push(PageLink::Page(1));
        if start > 2 {
            links.push(PageLink::Gap);
        }
    }

    links.extend((start..=end).map(|page| {
        if page == current {
            PageLink::Current(page)
        } else {
            PageLink::Page(page)
        }
    }));

    if end < page_count {
        if end + 1 < page_count {
            links.push(PageLink::Gap);
        }
        links.push(PageLink::Page(page_count));
    }

    if current < page_count {
        links.push(PageLink::Next(current + 1));
    }

    links
}

/// Render the pagination bar, where `page_url` maps a page number to its URL.
pub fn pagination_nav(links: &[PageLink], page_url: impl Fn(u64) -> String) -> Markup {
    html! {
        nav class="pagination flex justify-center my-4" aria-label="Pagination" {
            ul class="pagination flex items-center gap-4" {
                @for link in links {
                    li {
                        @match link {
                            PageLink::Current(page) => {
                                p aria-current="page" class="font-bold text-gray-900 dark:text-white" { (page) }
                            }
                            PageLink::Page(page) => {
                                a href=(page_url(*page)) class=(LINK_STYLE) { (page) }
                            }
                            PageLink::Gap => { "..." }
                            PageLink::Previous(page) => {
                                a href=(page_url(*page)) role="button" class=(LINK_STYLE) { "Back" }
                            }
                            PageLink::Next(page) => {
                                a href=(page_url(*page)) role="button" class=(LINK_STYLE) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}
