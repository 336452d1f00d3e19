//! The report export action.
//!
//! No file is produced yet, the handler only acknowledges the request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;

use crate::{
    alert::Alert,
    report::core::{ExportFormat, ReportType},
};

/// The export button's format plus the current values of the report controls.
#[derive(Debug, Deserialize)]
pub struct ExportForm {
    pub report: Option<ReportType>,
    pub format: ExportFormat,
}

/// Acknowledge an export request with a success alert.
pub async fn export_report(Form(form): Form<ExportForm>) -> Response {
    let report = form.report.unwrap_or_default();
    tracing::info!("Exporting {report} report as {}", form.format);

    (
        StatusCode::OK,
        Alert::Success {
            message: format!("Report exported as {}!", form.format),
            details: String::new(),
        }
        .into_html(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_extra::extract::Form;

    use crate::{
        endpoints,
        report::core::{ExportFormat, ReportType},
        test_utils::{get_authenticated_server, parse_html_fragment, select_text},
    };

    use super::{ExportForm, export_report};

    #[tokio::test]
    async fn acknowledges_export_with_format_name() {
        let response = export_report(Form(ExportForm {
            report: Some(ReportType::Category),
            format: ExportFormat::Csv,
        }))
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_eq!(
            select_text(&html, "#alert-container span.font-medium"),
            vec!["Report exported as CSV!"]
        );
    }

    #[tokio::test]
    async fn export_through_router_includes_report_controls() {
        let (server, _, _, cookie) = get_authenticated_server().await;

        let response = server
            .post(endpoints::REPORT_EXPORT)
            .add_cookie(cookie)
            .form(&[
                ("format", "pdf"),
                ("report", "monthly"),
                ("from", "2024-01-01"),
                ("to", "2024-01-31"),
            ])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Report exported as PDF!"));
    }

    #[tokio::test]
    async fn rejects_unknown_format() {
        let (server, _, _, cookie) = get_authenticated_server().await;

        let response = server
            .post(endpoints::REPORT_EXPORT)
            .add_cookie(cookie)
            .form(&[("format", "xlsx")])
            .await;

        assert!(response.status_code().is_client_error());
    }
}
