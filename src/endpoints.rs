//! The endpoint URIs for pages, htmx fragments and the JSON API.
//!
//! Paths with a `{...}` parameter are filled in with [format_endpoint].

/// Redirects to [REPORTS_VIEW].
pub const ROOT: &str = "/";
pub const REPORTS_VIEW: &str = "/reports";
pub const TRANSACTIONS_VIEW: &str = "/transactions";
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
pub const REGISTER_VIEW: &str = "/register";
/// Takes an optional `redirect_url` query parameter.
pub const LOG_IN_VIEW: &str = "/log_in";
/// Where htmx requests are sent after an unrecoverable server error.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// CSS, scripts and icons served from the `static/` directory.
pub const STATIC: &str = "/static";

// htmx endpoints. These answer with HTML fragments or HX-Redirect headers.
pub const LOG_IN_API: &str = "/api/log_in";
pub const LOG_OUT: &str = "/api/log_out";
/// POST here to register.
pub const USERS: &str = "/api/users";
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// PUT to edit, DELETE to remove.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The report card alone, swapped in when the report controls change.
pub const REPORT_CONTENT: &str = "/api/reports/content";
pub const REPORT_EXPORT: &str = "/api/reports/export";

// JSON API.
/// GET lists a page of transactions, POST creates one.
pub const JSON_TRANSACTIONS: &str = "/api/v1/transactions";
/// PATCH to update, DELETE to remove.
pub const JSON_TRANSACTION: &str = "/api/v1/transactions/{transaction_id}";
pub const JSON_CATEGORY_REPORT: &str = "/api/v1/reports/categories";
pub const JSON_MONTHLY_REPORT: &str = "/api/v1/reports/monthly";
pub const JSON_TOTALS_REPORT: &str = "/api/v1/reports/totals";

/// Substitute `id` for the `{...}` parameter in `endpoint_path`, e.g.
/// `/api/transactions/{transaction_id}` becomes `/api/transactions/42`.
///
/// Paths without a parameter are returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some((before, rest)) = endpoint_path.split_once('{') else {
        return endpoint_path.to_owned();
    };
    let after = rest.split_once('}').map_or("", |(_, after)| after);

    format!("{before}{id}{after}")
}
