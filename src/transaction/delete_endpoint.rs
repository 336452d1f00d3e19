//! Deleting a transaction from the transactions table.

use axum::{
    Extension,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    Error, UserID,
    db::{DbState, lock_connection},
    transaction::core::{TransactionId, delete_transaction},
};

/// Delete a transaction of the logged in user.
///
/// htmx swaps the table row with the response, so success is a 200 with an
/// empty body. Errors are shown as an alert.
pub async fn delete_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let deleted = lock_connection(&state.db_connection)
        .and_then(|connection| delete_transaction(user_id, transaction_id, &connection));

    match deleted {
        Ok(0) => Error::NotFound.into_alert_response(),
        Ok(_) => Html("").into_response(),
        Err(error) => {
            tracing::error!("could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
