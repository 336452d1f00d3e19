//! Route handlers for the reports page and its htmx content fragment.

use std::ops::RangeInclusive;

use axum::{
    Extension,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::Query;
use time::Date;

use crate::{
    Error, UserID,
    db::lock_connection,
    report::{
        ReportState,
        core::{ReportData, ReportQuery, ReportType, load_report},
        view::{report_content, reports_view},
    },
    timezone::get_local_date,
};

fn load(
    state: &ReportState,
    user_id: UserID,
    report_type: ReportType,
    range: RangeInclusive<Date>,
) -> Result<ReportData, Error> {
    let connection = lock_connection(&state.db_connection)?;

    load_report(user_id, report_type, range, &connection)
        .inspect_err(|error| tracing::error!("could not load {report_type} report: {error}"))
}

/// Render the reports page. Without query parameters it shows the monthly
/// summary for the current month.
pub async fn get_reports_page(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let range = query.range(get_local_date(&state.local_timezone)?);
    let report_type = query.report_type();

    let data = load(&state, user_id, report_type, range.clone())?;

    Ok(reports_view(report_type, &range, &data).into_response())
}

/// Render only the report card, for swapping into the reports page.
pub async fn get_report_content(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let data = get_local_date(&state.local_timezone)
        .and_then(|today| load(&state, user_id, query.report_type(), query.range(today)));

    match data {
        Ok(data) => Html(report_content(&data).into_string()).into_response(),
        Err(error) => error.into_alert_response(),
    }
}
