//! Transactions and the aggregates built from them.
//!
//! This module contains:
//! - The `Transaction` model and the store functions that create, list, update and delete it
//! - The per-category, per-type and per-month aggregates used by reports
//! - The HTML pages, htmx form endpoints and JSON handlers for transactions

mod aggregation;
mod api;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod query;
mod range;
mod transactions_page;

pub use aggregation::{
    CategoryTotal, MonthlySummary, TypeTotals, bucket_by_month, get_category_breakdown,
    get_monthly_summary, get_type_totals,
};
pub use api::{
    create_transaction_json, delete_transaction_json, list_transactions_json,
    patch_transaction_json,
};
pub use core::{
    MAX_AMOUNT, NewTransaction, RowsAffected, Transaction, TransactionId, TransactionType, TransactionUpdate,
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_new_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use query::{PageRequest, TransactionPage, list_transactions};
pub use range::{all_time, month_range, range_or_default};
pub use transactions_page::get_transactions_page;
