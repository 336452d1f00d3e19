//! The page for editing an existing transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error, UserID,
    db::{DbState, lock_connection},
    endpoints::{self, format_endpoint},
    transaction::{
        core::{TransactionId, get_transaction},
        form::{FormAction, TransactionFormDefaults, transaction_form_page},
    },
};

/// Renders the page for editing a transaction.
///
/// Responds with the 404 page if the transaction does not exist or belongs
/// to another user.
pub async fn get_edit_transaction_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let transaction = {
        let connection = lock_connection(&state.db_connection)?;

        get_transaction(user_id, transaction_id, &connection)?
    };

    let update_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let defaults = TransactionFormDefaults {
        transaction_type: transaction.type_,
        amount: Some(transaction.amount),
        date: transaction.date,
        category: transaction.category.as_deref(),
        description: transaction.description.as_deref(),
        autofocus_amount: false,
    };

    let page = transaction_form_page(
        "Edit Transaction",
        FormAction::Update(&update_url),
        "Save Changes",
        &defaults,
    );

    Ok(page.into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        Error,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_hx_endpoint, assert_valid_html, get_test_connection, insert_test_user,
            must_get_form, parse_html_document,
        },
        transaction::core::{Transaction, TransactionType, create_transaction},
    };

    use crate::db::DbState;

    use super::get_edit_transaction_page;

    #[tokio::test]
    async fn renders_prefilled_form() {
        let conn = get_test_connection();
        let user = insert_test_user("alice@example.com", &conn);
        let transaction = create_transaction(
            user.id,
            Transaction::build(TransactionType::Income, 1000.0, date!(2024 - 01 - 15))
                .category(Some("Salary".to_owned())),
            &conn,
        )
        .unwrap();
        let state = DbState::new(conn);

        let response =
            get_edit_transaction_page(State(state), Extension(user.id), Path(transaction.id))
                .await
                .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::TRANSACTION, transaction.id),
            "hx-put",
        );
        let category = form
            .select(&scraper::Selector::parse("input[name=category]").unwrap())
            .next()
            .unwrap();
        assert_eq!(category.value().attr("value"), Some("Salary"));
    }

    #[tokio::test]
    async fn other_users_transaction_is_not_found() {
        let conn = get_test_connection();
        let alice = insert_test_user("alice@example.com", &conn);
        let bob = insert_test_user("bob@example.com", &conn);
        let transaction = create_transaction(
            alice.id,
            Transaction::build(TransactionType::Income, 1000.0, date!(2024 - 01 - 15)),
            &conn,
        )
        .unwrap();
        let state = DbState::new(conn);

        let result =
            get_edit_transaction_page(State(state), Extension(bob.id), Path(transaction.id))
                .await;

        let Err(error) = result else {
            panic!("want not found error, got a page");
        };
        assert_eq!(error, Error::NotFound);
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }
}
