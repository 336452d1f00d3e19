//! The paginated table of a user's transactions with a date range filter.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error, UserID,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    html::{
        AMOUNT_NEGATIVE_STYLE, AMOUNT_POSITIVE_STYLE, BUTTON_DELETE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::nav_bar,
    pagination::{PaginationConfig, page_count, page_links, pagination_nav},
    transaction::{
        core::{Transaction, TransactionType},
        query::{PageRequest, TransactionPage, list_transactions},
        range::{all_time, range_or_default},
    },
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
    /// Page size defaults and the number of page links to show.
    pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The page and date filter selected by the user.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
pub struct TransactionsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Date>,
}

impl TransactionsQuery {
    fn to_url(self) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query_string) if !query_string.is_empty() => {
                format!("{}?{query_string}", endpoints::TRANSACTIONS_VIEW)
            }
            Ok(_) => endpoints::TRANSACTIONS_VIEW.to_owned(),
            Err(error) => {
                tracing::error!("Could not encode transactions query {self:?}: {error}");
                endpoints::TRANSACTIONS_VIEW.to_owned()
            }
        }
    }
}

/// Render a page of the user's transactions, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let config = &state.pagination_config;
    let curr_page = query.page.unwrap_or(config.default_page).max(1);
    let per_page = query.per_page.unwrap_or(config.default_page_size);
    let page_request = PageRequest::new(
        Some(per_page as i64),
        Some(((curr_page - 1) * per_page) as i64),
    )?;
    let range = range_or_default(query.from, query.to, all_time());

    let page = {
        let connection = lock_connection(&state.db_connection)?;

        list_transactions(user_id, range, page_request, &connection)
            .inspect_err(|error| tracing::error!("could not list transactions: {error}"))?
    };

    let page_count = page_count(page.total_count, per_page);
    let links = page_links(curr_page, page_count, config.max_pages);
    let pagination = pagination_nav(&links, |page| {
        TransactionsQuery {
            page: Some(page),
            per_page: Some(per_page),
            ..query
        }
        .to_url()
    });

    Ok(transactions_view(&page, &query, &pagination).into_response())
}

fn transactions_view(page: &TransactionPage, query: &TransactionsQuery, pagination: &Markup) -> Markup {

    let content = html!(
        (nav_bar(endpoints::TRANSACTIONS_VIEW))

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                (date_filter_form(query))

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (page.total_count) " transaction(s)"
                }

                div class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in &page.items {
                                (transaction_row(transaction))
                            }

                            @if page.items.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions found. Create a transaction "
                                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }

                (pagination)
            }
        }
    );

    base("Transactions", &[], &content)
}

fn date_filter_form(query: &TransactionsQuery) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="flex flex-wrap items-end gap-4"
        {
            @if let Some(per_page) = query.per_page {
                input type="hidden" name="per_page" value=(per_page);
            }

            div
            {
                label for="from" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    name="from"
                    id="from"
                    value=[query.from]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="to" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    name="to"
                    id="to"
                    value=[query.to]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(LINK_STYLE) { "Filter" }
        }
    )
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let (amount_style, sign) = match transaction.type_ {
        TransactionType::Income => (AMOUNT_POSITIVE_STYLE, "+"),
        TransactionType::Expense => (AMOUNT_NEGATIVE_STYLE, "-"),
    };
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }

            td class=(TABLE_CELL_STYLE) { (transaction.type_) }

            td class=(TABLE_CELL_STYLE)
            {
                (transaction.category.as_deref().unwrap_or(""))
            }

            td class=(TABLE_CELL_STYLE)
            {
                (transaction.description.as_deref().unwrap_or(""))
            }

            td class={"px-6 py-4 text-right " (amount_style)}
            {
                (sign) (format_currency(transaction.amount))
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        hx-delete=(delete_url)
                        hx-confirm="Are you sure you want to delete this transaction? This cannot be undone."
                        hx-target="closest tr"
                        hx-target-error="#alert-container"
                        hx-swap="delete"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    )
}
