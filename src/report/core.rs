//! The report types, the query that selects a report and the data each report shows.

use std::{fmt::Display, ops::RangeInclusive};

use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    Error, UserID,
    transaction::{
        CategoryTotal, MonthlySummary, TransactionType, TypeTotals, get_category_breakdown,
        get_monthly_summary, get_type_totals, month_range, range_or_default,
    },
};

/// The kinds of report a user can pick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Monthly,
    Category,
    Detailed,
    Trend,
}

impl ReportType {
    pub const ALL: [ReportType; 4] = [
        ReportType::Monthly,
        ReportType::Category,
        ReportType::Detailed,
        ReportType::Trend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Monthly => "monthly",
            ReportType::Category => "category",
            ReportType::Detailed => "detailed",
            ReportType::Trend => "trend",
        }
    }

    /// The name shown in the report picker.
    pub fn label(&self) -> &'static str {
        match self {
            ReportType::Monthly => "Monthly Summary",
            ReportType::Category => "Category Breakdown",
            ReportType::Detailed => "Detailed Transactions",
            ReportType::Trend => "Trend Analysis",
        }
    }
}

impl Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The file formats offered for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => f.write_str("CSV"),
            ExportFormat::Pdf => f.write_str("PDF"),
        }
    }
}

/// The report and date range requested through the query string.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct ReportQuery {
    pub report: Option<ReportType>,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl ReportQuery {
    pub fn report_type(&self) -> ReportType {
        self.report.unwrap_or_default()
    }

    /// The requested range, with missing ends taken from the month containing `today`.
    pub fn range(&self, today: Date) -> RangeInclusive<Date> {
        range_or_default(self.from, self.to, month_range(today))
    }
}

/// The aggregated data behind a report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportData {
    Monthly {
        months: Vec<MonthlySummary>,
        totals: TypeTotals,
    },
    Category(Vec<CategoryTotal>),
    /// Reports that only have a preview and run no queries.
    Preview(ReportType),
}

/// Run the queries needed for `report_type` and nothing else.
///
/// # Errors
/// Returns [Error::SqlError] if a query fails.
pub fn load_report(
    user_id: UserID,
    report_type: ReportType,
    range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<ReportData, Error> {
    match report_type {
        ReportType::Monthly => Ok(ReportData::Monthly {
            months: get_monthly_summary(user_id, range.clone(), connection)?,
            totals: get_type_totals(user_id, range, connection)?,
        }),
        ReportType::Category => Ok(ReportData::Category(get_category_breakdown(
            user_id,
            range,
            TransactionType::Expense,
            connection,
        )?)),
        ReportType::Detailed | ReportType::Trend => Ok(ReportData::Preview(report_type)),
    }
}
