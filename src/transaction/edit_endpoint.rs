//! The endpoint for saving the edit transaction form.

use axum::{
    Extension,
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::Form;

use crate::{
    Error, UserID,
    db::{DbState, lock_connection},
    transaction::{
        core::{TransactionId, update_transaction},
        form::{TransactionFormData, redirect_to_transactions},
    },
};

/// Replace a transaction with the edit form's values and send the user to
/// the transactions page.
///
/// Shows a 404 alert if the transaction does not exist or belongs to
/// another user.
pub async fn edit_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let result = form.into_update().and_then(|update| {
        let connection = lock_connection(&state.db_connection)?;
        update_transaction(user_id, transaction_id, update, &connection)
    });

    match result {
        Ok(0) => {
            tracing::warn!("user {user_id} tried to edit missing transaction {transaction_id}");
            Error::NotFound.into_alert_response()
        }
        Ok(_) => redirect_to_transactions(),
        Err(error) => {
            tracing::warn!("could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
