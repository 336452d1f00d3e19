//! JSON handlers for listing, creating, updating and deleting transactions.
//!
//! These mirror the HTML endpoints but take and return JSON, and report
//! errors as `{"error": "..."}` with [JsonError].

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::{
    Error, JsonError, UserID,
    db::{DbState, lock_connection},
    extract::{ApiJson, ApiPath, ApiQuery},
    transaction::{
        core::{
            RowsAffected, Transaction, TransactionId, TransactionType, TransactionUpdate,
            create_transaction, delete_transaction, update_transaction,
        },
        query::{PageRequest, TransactionPage, list_transactions},
        range::{all_time, range_or_default},
    },
};

/// Query parameters for listing transactions. Missing dates leave that end of the range open.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// The body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub category: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub date: Date,
}

/// The body for a partial update.
///
/// An omitted field is left unchanged. For `category` and `description`,
/// an explicit `null` clears the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionPatch {
    #[serde(rename = "type")]
    pub type_: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub date: Option<Date>,
}

impl TryFrom<TransactionPatch> for TransactionUpdate {
    type Error = Error;

    fn try_from(patch: TransactionPatch) -> Result<Self, Self::Error> {
        let type_ = match patch.type_ {
            Some(type_) => Some(type_.parse::<TransactionType>()?),
            None => None,
        };

        Ok(TransactionUpdate {
            type_,
            category: patch.category,
            amount: patch.amount,
            description: patch.description,
            date: patch.date,
        })
    }
}

// `null` must become `Some(None)`, which plain `Option<Option<T>>` does not do.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The response body for updates and deletes.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RowsAffectedResponse {
    pub rows_affected: RowsAffected,
}

/// `GET /api/v1/transactions`
pub async fn list_transactions_json(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<TransactionPage>, JsonError> {
    let page_request = PageRequest::new(query.limit, query.offset)?;
    let range = range_or_default(query.from, query.to, all_time());

    let connection = lock_connection(&state.db_connection)?;

    let page = list_transactions(user_id, range, page_request, &connection)?;

    Ok(Json(page))
}

/// `POST /api/v1/transactions`
pub async fn create_transaction_json(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(request): ApiJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), JsonError> {
    let type_ = request.type_.parse::<TransactionType>()?;
    let new_transaction = Transaction::build(type_, request.amount, request.date)
        .category(request.category)
        .description(request.description);

    let connection = lock_connection(&state.db_connection)?;

    let transaction = create_transaction(user_id, new_transaction, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// `PATCH /api/v1/transactions/{transaction_id}`
pub async fn patch_transaction_json(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
    ApiJson(patch): ApiJson<TransactionPatch>,
) -> Result<Json<RowsAffectedResponse>, JsonError> {
    let update = TransactionUpdate::try_from(patch)?;

    let connection = lock_connection(&state.db_connection)?;

    let rows_affected = update_transaction(user_id, transaction_id, update, &connection)?;

    Ok(Json(RowsAffectedResponse { rows_affected }))
}

/// `DELETE /api/v1/transactions/{transaction_id}`
pub async fn delete_transaction_json(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<Json<RowsAffectedResponse>, JsonError> {
    let connection = lock_connection(&state.db_connection)?;

    let rows_affected = delete_transaction(user_id, transaction_id, &connection)?;

    Ok(Json(RowsAffectedResponse { rows_affected }))
}

#[cfg(test)]
mod patch_tests {
    use time::macros::date;

    use crate::transaction::core::{TransactionType, TransactionUpdate};

    use super::TransactionPatch;

    fn parse(json: &str) -> TransactionUpdate {
        let patch: TransactionPatch = serde_json::from_str(json).unwrap();
        TransactionUpdate::try_from(patch).unwrap()
    }

    #[test]
    fn omitted_fields_are_unchanged() {
        assert_eq!(parse("{}"), TransactionUpdate::default());
    }

    #[test]
    fn null_clears_optional_text() {
        assert_eq!(
            parse(r#"{"category": null, "description": "Lunch"}"#),
            TransactionUpdate {
                category: Some(None),
                description: Some(Some("Lunch".to_owned())),
                ..Default::default()
            }
        );
    }

    #[test]
    fn parses_type_and_date() {
        assert_eq!(
            parse(r#"{"type": "income", "date": "2024-01-15", "amount": 5.5}"#),
            TransactionUpdate {
                type_: Some(TransactionType::Income),
                date: Some(date!(2024 - 01 - 15)),
                amount: Some(5.5),
                ..Default::default()
            }
        );
    }

    #[test]
    fn rejects_unknown_type() {
        let patch: TransactionPatch = serde_json::from_str(r#"{"type": "transfer"}"#).unwrap();

        assert!(TransactionUpdate::try_from(patch).is_err());
    }
}
