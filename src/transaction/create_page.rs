//! The page for recording a new transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    timezone::get_local_date,
    transaction::{
        core::TransactionType,
        form::{FormAction, TransactionFormDefaults, transaction_form_page},
    },
};

#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// Today's date, the form's default, is taken in this timezone.
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render an empty expense form dated today.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    let defaults = TransactionFormDefaults {
        transaction_type: TransactionType::Expense,
        amount: None,
        date: get_local_date(&state.local_timezone)?,
        category: None,
        description: None,
        autofocus_amount: true,
    };

    let page = transaction_form_page(
        "New Transaction",
        FormAction::Create,
        "Create Transaction",
        &defaults,
    );

    Ok(page.into_response())
}
