//! The reports page, its export action and the JSON report endpoints.

mod api;
mod core;
mod export;
mod page;
mod view;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use api::{get_category_report_json, get_monthly_report_json, get_totals_report_json};
pub use export::export_report;
pub use page::{get_report_content, get_reports_page};

/// Reports need the local timezone to work out the current month.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}
