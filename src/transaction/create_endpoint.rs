//! Saving the new transaction form.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;

use crate::{
    Error, UserID,
    db::{DbState, lock_connection},
    transaction::{
        core::create_transaction,
        form::{TransactionFormData, redirect_to_transactions},
    },
};

fn save(state: &DbState, user_id: UserID, form: TransactionFormData) -> Result<(), Error> {
    let transaction = form.into_new_transaction()?;
    let connection = lock_connection(&state.db_connection)?;

    create_transaction(user_id, transaction, &connection)?;

    Ok(())
}

/// Record a transaction for the logged in user and send them to the
/// transactions page. Problems are shown as an alert.
pub async fn create_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    match save(&state, user_id, form) {
        Ok(()) => redirect_to_transactions(),
        Err(error) => {
            tracing::warn!("user {user_id} could not create a transaction: {error}");
            error.into_alert_response()
        }
    }
}
