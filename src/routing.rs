//! The app's routes and the auth guard that applies to each group.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, patch, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, auth_guard_json, get_log_in_page, get_log_out,
        get_register_page, post_log_in, register_user,
    },
    endpoints,
    error_page::{get_404_not_found, get_internal_server_error_page},
    report::{
        export_report, get_category_report_json, get_monthly_report_json, get_report_content,
        get_reports_page, get_totals_report_json,
    },
    transaction::{
        create_transaction_endpoint, create_transaction_json, delete_transaction_endpoint,
        delete_transaction_json, edit_transaction_endpoint, get_edit_transaction_page,
        get_new_transaction_page, get_transactions_page, list_transactions_json,
        patch_transaction_json,
    },
};

/// Pages and forms that work without a session.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::INTERNAL_ERROR_VIEW, get(get_internal_server_error_page))
}

fn page_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .route(endpoints::EDIT_TRANSACTION_VIEW, get(get_edit_transaction_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
}

/// Endpoints called by htmx, which needs `HX-Redirect` rather than a plain
/// redirect to leave the page for the log-in form.
fn htmx_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(endpoints::TRANSACTIONS_API, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::REPORT_CONTENT, get(get_report_content))
        .route(endpoints::REPORT_EXPORT, post(export_report))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx))
}

fn json_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            endpoints::JSON_TRANSACTIONS,
            get(list_transactions_json).post(create_transaction_json),
        )
        .route(
            endpoints::JSON_TRANSACTION,
            patch(patch_transaction_json).delete(delete_transaction_json),
        )
        .route(endpoints::JSON_CATEGORY_REPORT, get(get_category_report_json))
        .route(endpoints::JSON_MONTHLY_REPORT, get(get_monthly_report_json))
        .route(endpoints::JSON_TOTALS_REPORT, get(get_totals_report_json))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_json))
}

/// Build the app's router. Static files are served from `static/` in the
/// working directory.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(page_routes(&state))
        .merge(htmx_routes(&state))
        .merge(json_routes(&state))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// `/` has no page of its own.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::REPORTS_VIEW)
}
