//! JSON handlers for the report aggregates.

use std::ops::RangeInclusive;

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use time::Date;

use crate::{
    Error, JsonError, UserID,
    db::lock_connection,
    extract::ApiQuery,
    report::ReportState,
    timezone::get_local_date,
    transaction::{
        CategoryTotal, MonthlySummary, TransactionType, TypeTotals, get_category_breakdown,
        get_monthly_summary, get_type_totals, month_range, range_or_default,
    },
};

/// A date range where a missing end defaults to the current month.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

/// The query for the category breakdown. `type` defaults to "expense".
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub from: Option<Date>,
    pub to: Option<Date>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
}

fn resolve_range(
    from: Option<Date>,
    to: Option<Date>,
    local_timezone: &str,
) -> Result<RangeInclusive<Date>, Error> {
    let today = get_local_date(local_timezone)?;

    Ok(range_or_default(from, to, month_range(today)))
}

/// `GET /api/v1/reports/categories`
pub async fn get_category_report_json(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> Result<Json<Vec<CategoryTotal>>, JsonError> {
    let type_ = match query.type_ {
        Some(type_) => type_.parse::<TransactionType>()?,
        None => TransactionType::Expense,
    };
    let range = resolve_range(query.from, query.to, &state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;

    let breakdown = get_category_breakdown(user_id, range, type_, &connection)?;

    Ok(Json(breakdown))
}

/// `GET /api/v1/reports/monthly`
pub async fn get_monthly_report_json(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> Result<Json<Vec<MonthlySummary>>, JsonError> {
    let range = resolve_range(query.from, query.to, &state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;

    let summary = get_monthly_summary(user_id, range, &connection)?;

    Ok(Json(summary))
}

/// `GET /api/v1/reports/totals`
pub async fn get_totals_report_json(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> Result<Json<TypeTotals>, JsonError> {
    let range = resolve_range(query.from, query.to, &state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;

    let totals = get_type_totals(user_id, range, &connection)?;

    Ok(Json(totals))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        AppState, endpoints,
        test_utils::{get_authenticated_server, insert_test_user, log_in},
        transaction::{Transaction, TransactionType, create_transaction},
        user::User,
    };

    fn insert_january(user: &User, state: &AppState) {
        let connection = state.db_connection.lock().unwrap();
        let transactions = [
            Transaction::build(TransactionType::Income, 1000.0, date!(2024 - 01 - 15))
                .category(Some("Salary".to_owned())),
            Transaction::build(TransactionType::Expense, 400.0, date!(2024 - 01 - 20))
                .category(Some("Rent".to_owned())),
            Transaction::build(TransactionType::Expense, 50.0, date!(2024 - 02 - 03))
                .category(Some("Food".to_owned())),
            Transaction::build(TransactionType::Expense, 30.0, date!(2024 - 02 - 04))
                .category(Some("Food".to_owned())),
        ];

        for transaction in transactions {
            create_transaction(user.id, transaction, &connection).unwrap();
        }
    }

    async fn get_json(
        server: &TestServer,
        endpoint: &str,
        params: &[(&str, &str)],
        cookie: axum_extra::extract::cookie::Cookie<'static>,
    ) -> Value {
        let mut request = server.get(endpoint).add_cookie(cookie);
        for (key, value) in params {
            request = request.add_query_param(key, value);
        }

        let response = request.await;
        response.assert_status_ok();
        response.json()
    }

    #[tokio::test]
    async fn monthly_report_buckets_by_month() {
        let (server, state, user, cookie) = get_authenticated_server().await;
        insert_january(&user, &state);

        let body = get_json(
            &server,
            endpoints::JSON_MONTHLY_REPORT,
            &[("from", "2024-01-01"), ("to", "2024-02-29")],
            cookie,
        )
        .await;

        assert_eq!(
            body,
            json!([
                {"month": "Jan 2024", "income": 1000.0, "expense": 400.0},
                {"month": "Feb 2024", "income": 0.0, "expense": 80.0},
            ])
        );
    }

    #[tokio::test]
    async fn category_report_defaults_to_expenses() {
        let (server, state, user, cookie) = get_authenticated_server().await;
        insert_january(&user, &state);

        let body = get_json(
            &server,
            endpoints::JSON_CATEGORY_REPORT,
            &[("from", "2024-02-01"), ("to", "2024-02-29")],
            cookie,
        )
        .await;

        assert_eq!(body, json!([{"category": "Food", "total": 80.0}]));
    }

    #[tokio::test]
    async fn category_report_accepts_income() {
        let (server, state, user, cookie) = get_authenticated_server().await;
        insert_january(&user, &state);

        let body = get_json(
            &server,
            endpoints::JSON_CATEGORY_REPORT,
            &[("from", "2024-01-01"), ("to", "2024-02-29"), ("type", "income")],
            cookie,
        )
        .await;

        assert_eq!(body, json!([{"category": "Salary", "total": 1000.0}]));
    }

    #[tokio::test]
    async fn category_report_rejects_unknown_type() {
        let (server, _, _, cookie) = get_authenticated_server().await;

        let response = server
            .get(endpoints::JSON_CATEGORY_REPORT)
            .add_query_param("type", "transfer")
            .add_cookie(cookie)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_date_is_a_json_error() {
        let (server, _, _, cookie) = get_authenticated_server().await;

        let response = server
            .get(endpoints::JSON_MONTHLY_REPORT)
            .add_query_param("from", "2024-13-45")
            .add_cookie(cookie)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].is_string(), "got {body}");
    }

    #[tokio::test]
    async fn totals_cover_whole_range() {
        let (server, state, user, cookie) = get_authenticated_server().await;
        insert_january(&user, &state);

        let body = get_json(
            &server,
            endpoints::JSON_TOTALS_REPORT,
            &[("from", "2024-01-01"), ("to", "2024-02-29")],
            cookie,
        )
        .await;

        assert_eq!(body, json!({"income": 1000.0, "expense": 480.0}));
    }

    #[tokio::test]
    async fn reports_are_scoped_to_caller() {
        let (server, state, user, _) = get_authenticated_server().await;
        insert_january(&user, &state);
        insert_test_user("bob@example.com", &state.db_connection.lock().unwrap());
        let bob_cookie = log_in(&server, "bob@example.com").await;

        let body = get_json(
            &server,
            endpoints::JSON_TOTALS_REPORT,
            &[("from", "2024-01-01"), ("to", "2024-02-29")],
            bob_cookie,
        )
        .await;

        assert_eq!(body, json!({"income": 0.0, "expense": 0.0}));
    }
}
