//! Finboard is a web app for tracking income and expenses and reviewing
//! monthly and per-category reports.
//!
//! This library provides a server that directly serves HTML pages, htmx
//! fragments and a JSON API under `/api/v1`.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

/// How long open connections get to finish once shutdown starts.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(1);

mod alert;
mod app_state;
mod auth;
mod db;
mod endpoints;
mod error;
mod error_page;
mod extract;
mod html;
mod logging;
mod navigation;
mod pagination;
mod password;
mod report;
mod routing;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::{Error, JsonError, ValidationError};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{
    CategoryTotal, MonthlySummary, NewTransaction, PageRequest, RowsAffected, Transaction,
    TransactionId, TransactionPage, TransactionType, TransactionUpdate, TypeTotals,
    create_transaction, delete_transaction, get_category_breakdown, get_monthly_summary,
    get_transaction, get_type_totals, list_transactions, update_transaction,
};
pub use user::{User, UserID, create_user, get_user_by_email, get_user_by_id, update_password};

/// Wait for ctrl+c or, on Unix, SIGTERM, then ask the server behind
/// `handle` to finish in-flight requests and stop.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::debug!("received ctrl+c"),
            Err(error) => {
                tracing::error!("could not listen for ctrl+c: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                tracing::debug!("received SIGTERM");
            }
            Err(error) => {
                tracing::error!("could not listen for SIGTERM: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutting down");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
}
