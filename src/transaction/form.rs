//! The form shared by the new and edit transaction pages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        dollar_input_styles, loading_spinner,
    },
    navigation::nav_bar,
    transaction::core::{
        MAX_AMOUNT, NewTransaction, Transaction, TransactionType, TransactionUpdate,
    },
};

/// What the transaction form submits.
///
/// Read with `axum_extra`'s `Form`, which turns an empty category or
/// description into `None` where `axum::Form` would reject the request.
#[derive(Debug, Deserialize)]
pub struct TransactionFormData {
    /// "income" or "expense", checked when converting.
    #[serde(rename = "type")]
    pub type_: String,
    pub amount: f64,
    pub date: Date,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TransactionFormData {
    fn parse_type(&self) -> Result<TransactionType, Error> {
        Ok(self.type_.parse::<TransactionType>()?)
    }

    pub fn into_new_transaction(self) -> Result<NewTransaction, Error> {
        let type_ = self.parse_type()?;

        Ok(Transaction::build(type_, self.amount, self.date)
            .category(self.category)
            .description(self.description))
    }

    /// Every field is replaced, so an empty category or description clears
    /// the stored value.
    pub fn into_update(self) -> Result<TransactionUpdate, Error> {
        Ok(TransactionUpdate {
            type_: Some(self.parse_type()?),
            amount: Some(self.amount),
            date: Some(self.date),
            category: Some(self.category),
            description: Some(self.description),
        })
    }
}

/// Send htmx back to the transactions table after a successful save.
pub fn redirect_to_transactions() -> Response {
    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

/// Where a transaction form is sent.
pub enum FormAction<'a> {
    /// `hx-post` to the collection endpoint.
    Create,
    /// `hx-put` to the given transaction URL.
    Update(&'a str),
}

/// The values the form fields start with.
pub struct TransactionFormDefaults<'a> {
    pub transaction_type: TransactionType,
    pub amount: Option<f64>,
    pub date: Date,
    pub category: Option<&'a str>,
    pub description: Option<&'a str>,
    pub autofocus_amount: bool,
}

fn type_option(option: TransactionType, selected: TransactionType) -> Markup {
    let id = format!("transaction-type-{option}");
    let label = match option {
        TransactionType::Income => "Income",
        TransactionType::Expense => "Expense",
    };

    html! {
        div class="flex items-center gap-3" {
            input
                id=(id)
                name="type"
                type="radio"
                value=(option.as_str())
                class=(FORM_RADIO_INPUT_STYLE)
                checked[option == selected]
                required;
            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (label) }
        }
    }
}

/// An optional free text field whose `id` and `name` are both `name`.
fn text_field(name: &str, label: &str, placeholder: &str, value: Option<&str>) -> Markup {
    html! {
        div {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }
            input
                id=(name)
                name=(name)
                type="text"
                placeholder=(placeholder)
                value=[value]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// The inputs for a transaction, without the surrounding `form` or submit
/// button. Pair with [crate::html::dollar_input_styles] for the amount prefix.
pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let amount = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        fieldset class="space-y-2" {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }
            div class=(FORM_RADIO_GROUP_STYLE) {
                @for option in [TransactionType::Expense, TransactionType::Income] {
                    (type_option(option, defaults.transaction_type))
                }
            }
        }

        div {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
            // Without w-full a prefilled input shrinks to fit its value.
            div class="input-wrapper w-full" {
                input
                    id="amount"
                    name="amount"
                    type="number"
                    min="0.01"
                    max=(MAX_AMOUNT)
                    step="0.01"
                    placeholder="0.00"
                    value=[amount]
                    class=(FORM_TEXT_INPUT_STYLE)
                    autofocus[defaults.autofocus_amount]
                    required;
            }
        }

        div {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }
            input id="date" name="date" type="date" value=(defaults.date) class=(FORM_TEXT_INPUT_STYLE) required;
        }

        (text_field("category", "Category", "e.g. Groceries", defaults.category))
        (text_field("description", "Description", "e.g. Weekly shop", defaults.description))
    }
}

/// A full page holding one transaction form.
///
/// Errors from the server are shown in the page's alert container.
pub fn transaction_form_page(
    title: &str,
    action: FormAction<'_>,
    submit_label: &str,
    defaults: &TransactionFormDefaults<'_>,
) -> Markup {
    let (post_url, put_url) = match action {
        FormAction::Create => (Some(endpoints::TRANSACTIONS_API), None),
        FormAction::Update(url) => (None, Some(url)),
    };
    let nav_page = if put_url.is_some() {
        endpoints::EDIT_TRANSACTION_VIEW
    } else {
        endpoints::NEW_TRANSACTION_VIEW
    };

    let content = html! {
        (nav_bar(nav_page))

        div class=(FORM_CONTAINER_STYLE) {
            form
                hx-post=[post_url]
                hx-put=[put_url]
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { (title) }

                (transaction_form_fields(defaults))

                button id="submit-button" type="submit" class=(BUTTON_PRIMARY_STYLE) {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    (submit_label)
                }

                @if put_url.is_some() {
                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Cancel" }
                }
            }
        }
    };

    base(title, &[dollar_input_styles()], &content)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use scraper::{Html, Selector};
    use time::macros::date;

    use super::{TransactionFormDefaults, redirect_to_transactions, transaction_form_fields};
    use crate::{endpoints, test_utils::assert_hx_redirect, transaction::core::TransactionType};

    #[test]
    fn saved_form_redirects_to_transactions() {
        let response = redirect_to_transactions();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
    }

    #[test]
    fn checks_selected_type() {
        let cases = [
            (TransactionType::Expense, "expense"),
            (TransactionType::Income, "income"),
        ];

        for (transaction_type, expected) in cases {
            let html = render_fields(&TransactionFormDefaults {
                transaction_type,
                amount: None,
                date: date!(2025 - 10 - 05),
                category: None,
                description: None,
                autofocus_amount: false,
            });
            assert_checked_value(&html, expected);
        }
    }

    #[test]
    fn prefills_values() {
        let html = render_fields(&TransactionFormDefaults {
            transaction_type: TransactionType::Income,
            amount: Some(1000.0),
            date: date!(2024 - 01 - 15),
            category: Some("Salary"),
            description: None,
            autofocus_amount: true,
        });

        assert_input_value(&html, "amount", Some("1000.00"));
        assert_input_value(&html, "date", Some("2024-01-15"));
        assert_input_value(&html, "category", Some("Salary"));
        assert_input_value(&html, "description", None);
    }

    fn render_fields(defaults: &TransactionFormDefaults<'_>) -> Html {
        let markup = maud::html! { form { (transaction_form_fields(defaults)) } };
        Html::parse_document(&markup.into_string())
    }

    #[track_caller]
    fn assert_input_value(document: &Html, name: &str, want: Option<&str>) {
        let selector = Selector::parse(&format!("input[name={name}]")).unwrap();
        let input = document
            .select(&selector)
            .next()
            .unwrap_or_else(|| panic!("missing input {name}"));

        assert_eq!(input.value().attr("value"), want, "value of input {name}");
    }

    #[track_caller]
    fn assert_checked_value(document: &Html, expected: &str) {
        let selector = Selector::parse("input[type=radio][name=type]").unwrap();
        let inputs = document.select(&selector).collect::<Vec<_>>();
        assert_eq!(
            inputs.len(),
            2,
            "want 2 transaction type inputs, got {}",
            inputs.len()
        );

        let checked = inputs
            .iter()
            .find(|input| input.value().attr("checked").is_some())
            .and_then(|input| input.value().attr("value"));
        assert_eq!(
            checked,
            Some(expected),
            "want checked transaction type to be {expected}, got {checked:?}"
        );
    }
}
