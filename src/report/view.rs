//! Markup for the reports page and the report content fragment.

use std::ops::RangeInclusive;

use maud::{Markup, html};
use time::Date;

use crate::{
    endpoints,
    html::{
        AMOUNT_NEGATIVE_STYLE, AMOUNT_POSITIVE_STYLE, BUTTON_PRIMARY_STYLE,
        BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, format_currency_rounded,
    },
    navigation::nav_bar,
    report::core::{ExportFormat, ReportData, ReportType},
    transaction::{CategoryTotal, MonthlySummary, TypeTotals},
};

const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The full reports page with the controls and the initial report content.
pub fn reports_view(
    report_type: ReportType,
    range: &RangeInclusive<Date>,
    data: &ReportData,
) -> Markup {
    let content = html!(
        (nav_bar(endpoints::REPORTS_VIEW))

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full lg:max-w-5xl space-y-6"
            {
                header class="flex flex-wrap items-center justify-between gap-4"
                {
                    div
                    {
                        h1 class="text-3xl font-bold tracking-tight" { "Reports" }
                        p class="text-gray-500 dark:text-gray-400"
                        {
                            "Generate and download financial reports"
                        }
                    }

                    div class="flex gap-2"
                    {
                        (export_button(ExportFormat::Csv, "Export CSV", BUTTON_SECONDARY_STYLE))
                        (export_button(ExportFormat::Pdf, "Export PDF", BUTTON_PRIMARY_STYLE))
                    }
                }

                section class=(CARD_STYLE)
                {
                    h2 class="text-xl font-semibold" { "Report Configuration" }
                    p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Configure the parameters for your financial report"
                    }

                    (report_controls(report_type, range))
                }

                div id="report-content"
                {
                    (report_content(data))
                }
            }
        }
    );

    base("Reports", &[], &content)
}

fn export_button(format: ExportFormat, text: &str, style: &str) -> Markup {
    let format_value = match format {
        ExportFormat::Csv => r#"{"format": "csv"}"#,
        ExportFormat::Pdf => r#"{"format": "pdf"}"#,
    };

    html!(
        button
            type="button"
            hx-post=(endpoints::REPORT_EXPORT)
            hx-vals=(format_value)
            hx-include="#report-controls"
            hx-swap="none"
            hx-target-error="#alert-container"
            class=(style)
        {
            (text)
        }
    )
}

/// Changing any control re-requests the report content. A newer request
/// replaces one that is still in flight.
fn report_controls(report_type: ReportType, range: &RangeInclusive<Date>) -> Markup {
    html!(
        form
            id="report-controls"
            hx-get=(endpoints::REPORT_CONTENT)
            hx-trigger="change"
            hx-target="#report-content"
            hx-target-error="#alert-container"
            hx-sync="this:replace"
            class="grid gap-4 md:grid-cols-3"
        {
            div
            {
                label for="report" class=(FORM_LABEL_STYLE) { "Report type" }
                select name="report" id="report" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for choice in ReportType::ALL {
                        option value=(choice.as_str()) selected[choice == report_type]
                        {
                            (choice.label())
                        }
                    }
                }
            }

            div
            {
                label for="from" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    name="from"
                    id="from"
                    value=(range.start())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="to" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    name="to"
                    id="to"
                    value=(range.end())
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    )
}

/// The card for the selected report, swapped into `#report-content`.
pub fn report_content(data: &ReportData) -> Markup {
    match data {
        ReportData::Monthly { months, totals } => monthly_report(months, totals),
        ReportData::Category(categories) => category_report(categories),
        ReportData::Preview(report_type) => report_preview(*report_type),
    }
}

fn net_income_cell(net_income: f64) -> Markup {
    if net_income > 0.0 {
        html!(
            td class={"px-6 py-4 text-right font-medium " (AMOUNT_POSITIVE_STYLE)}
            {
                "+" (format_currency(net_income))
            }
        )
    } else {
        html!(
            td class={"px-6 py-4 text-right font-medium " (AMOUNT_NEGATIVE_STYLE)}
            {
                (format_currency(net_income))
            }
        )
    }
}

fn monthly_report(months: &[MonthlySummary], totals: &TypeTotals) -> Markup {
    html!(
        section class=(CARD_STYLE) data-report="monthly"
        {
            h2 class="text-xl font-semibold" { "Monthly Summary Report" }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "Overview of your financial activity by month"
            }

            div class="overflow-x-auto"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                            th scope="col" class="px-6 py-3 text-right" { "Total Income" }
                            th scope="col" class="px-6 py-3 text-right" { "Total Expenses" }
                            th scope="col" class="px-6 py-3 text-right" { "Net Income" }
                        }
                    }

                    tbody
                    {
                        @for month in months {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (month.month) }
                                td class={"px-6 py-4 text-right " (AMOUNT_POSITIVE_STYLE)}
                                {
                                    (format_currency(month.income))
                                }
                                td class={"px-6 py-4 text-right " (AMOUNT_NEGATIVE_STYLE)}
                                {
                                    (format_currency(month.expense))
                                }
                                (net_income_cell(month.net_income()))
                            }
                        }

                        @if months.is_empty() {
                            tr
                            {
                                td
                                    colspan="4"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No transactions in this period."
                                }
                            }
                        }
                    }

                    tfoot
                    {
                        tr class="font-semibold text-gray-900 dark:text-white"
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                            td class={"px-6 py-4 text-right " (AMOUNT_POSITIVE_STYLE)}
                            {
                                (format_currency(totals.income))
                            }
                            td class={"px-6 py-4 text-right " (AMOUNT_NEGATIVE_STYLE)}
                            {
                                (format_currency(totals.expense))
                            }
                            (net_income_cell(totals.net_income()))
                        }
                    }
                }
            }
        }
    )
}

/// Each bar is `total / 100` percent wide, so totals above 10,000 overflow the track.
fn category_report(categories: &[CategoryTotal]) -> Markup {
    html!(
        section class=(CARD_STYLE) data-report="category"
        {
            h2 class="text-xl font-semibold" { "Category Breakdown" }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "Spending breakdown by category"
            }

            @if categories.is_empty() {
                p class="py-4 text-center text-gray-500 dark:text-gray-400"
                {
                    "No expenses in this period."
                }
            }

            ul class="space-y-4"
            {
                @for category in categories {
                    li class="flex-1" data-category-bar
                    {
                        div class="mb-1 flex items-center justify-between"
                        {
                            span class="text-sm font-medium"
                            {
                                (category.category.as_deref().unwrap_or(UNCATEGORIZED_LABEL))
                            }
                            span class="text-sm text-gray-500 dark:text-gray-400"
                            {
                                (format_currency_rounded(category.total))
                            }
                        }

                        div class="h-2 w-full rounded-full bg-gray-200 dark:bg-gray-700"
                        {
                            div
                                class="h-2 rounded-full bg-blue-600"
                                style={"width: " (category.total / 100.0) "%"}
                            {}
                        }
                    }
                }
            }
        }
    )
}

fn report_preview(report_type: ReportType) -> Markup {
    let (title, description, summary) = match report_type {
        ReportType::Trend => (
            "Trend Analysis Report",
            "Financial trends and patterns over time",
            "This report will show spending trends, patterns, and forecasts.",
        ),
        _ => (
            "Detailed Transaction Report",
            "Complete list of all transactions in the selected period",
            "This report will include all transaction details for the selected period.",
        ),
    };

    html!(
        section class=(CARD_STYLE) data-report=(report_type.as_str())
        {
            h2 class="text-xl font-semibold" { (title) }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400" { (description) }

            div class="py-8 text-center text-gray-500 dark:text-gray-400"
            {
                p class="mb-2 text-lg font-medium" { "Report Preview" }
                p { (summary) }

                div class="mt-4 inline-block"
                {
                    (export_button(ExportFormat::Pdf, "Generate Full Report", BUTTON_PRIMARY_STYLE))
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use maud::Markup;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        endpoints,
        report::core::{ReportData, ReportType},
        test_utils::{assert_valid_html, select_text},
        transaction::{CategoryTotal, MonthlySummary, TypeTotals},
    };

    use super::{report_content, reports_view};

    fn parse(markup: Markup) -> Html {
        Html::parse_fragment(&markup.into_string())
    }

    #[test]
    fn monthly_report_shows_signed_net_income() {
        let html = parse(report_content(&ReportData::Monthly {
            months: vec![
                MonthlySummary {
                    month: "Jan 2024".to_owned(),
                    income: 1000.0,
                    expense: 400.0,
                },
                MonthlySummary {
                    month: "Feb 2024".to_owned(),
                    income: 100.0,
                    expense: 250.0,
                },
            ],
            totals: TypeTotals {
                income: 900.0,
                expense: 650.0,
            },
        }));

        assert_eq!(
            select_text(&html, "tbody tr td:nth-child(4)"),
            vec!["+$600.00", "-$150.00"]
        );
        let positive = html
            .select(&Selector::parse("tbody tr td:nth-child(4)").unwrap())
            .next()
            .unwrap();
        assert!(positive.value().attr("class").unwrap().contains("text-green-600"));
        assert_eq!(
            select_text(&html, "tfoot td"),
            vec!["$900.00", "$650.00", "+$250.00"]
        );
    }

    #[test]
    fn zero_net_income_is_not_positive() {
        let html = parse(report_content(&ReportData::Monthly {
            months: vec![MonthlySummary {
                month: "Mar 2024".to_owned(),
                income: 50.0,
                expense: 50.0,
            }],
            totals: TypeTotals::default(),
        }));

        assert_eq!(
            select_text(&html, "tbody tr td:nth-child(4)"),
            vec!["$0.00"]
        );
    }

    #[test]
    fn category_report_draws_proportional_bars() {
        let html = parse(report_content(&ReportData::Category(vec![
            CategoryTotal {
                category: Some("Food".to_owned()),
                total: 80.0,
            },
            CategoryTotal {
                category: None,
                total: 2500.0,
            },
        ])));

        assert_eq!(
            select_text(&html, "li[data-category-bar] span.font-medium"),
            vec!["Food", "Uncategorized"]
        );
        let widths = html
            .select(&Selector::parse("li[data-category-bar] div.bg-blue-600").unwrap())
            .map(|bar| bar.value().attr("style").unwrap().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(widths, vec!["width: 0.8%", "width: 25%"]);
    }

    #[test]
    fn previews_offer_full_report_export() {
        for report_type in [ReportType::Detailed, ReportType::Trend] {
            let html = parse(report_content(&ReportData::Preview(report_type)));

            let button = html
                .select(&Selector::parse("button").unwrap())
                .next()
                .expect("missing generate button");
            assert_eq!(button.text().collect::<String>().trim(), "Generate Full Report");
            assert_eq!(button.value().attr("hx-post"), Some(endpoints::REPORT_EXPORT));
            assert_eq!(button.value().attr("hx-vals"), Some(r#"{"format": "pdf"}"#));
        }
    }

    #[test]
    fn controls_request_latest_content() {
        let html = Html::parse_document(
            &reports_view(
                ReportType::Category,
                &(date!(2024 - 01 - 01)..=date!(2024 - 01 - 31)),
                &ReportData::Category(Vec::new()),
            )
            .into_string(),
        );
        assert_valid_html(&html);

        let form = html
            .select(&Selector::parse("form#report-controls").unwrap())
            .next()
            .expect("missing report controls");
        assert_eq!(form.value().attr("hx-get"), Some(endpoints::REPORT_CONTENT));
        assert_eq!(form.value().attr("hx-sync"), Some("this:replace"));
        assert_eq!(
            select_text(&html, "select[name=report] option[selected]"),
            vec!["Category Breakdown"]
        );
        let from = html
            .select(&Selector::parse("input[name=from]").unwrap())
            .next()
            .unwrap();
        assert_eq!(from.value().attr("value"), Some("2024-01-01"));
        assert_eq!(
            select_text(&html, "header button"),
            vec!["Export CSV", "Export PDF"]
        );
    }
}
