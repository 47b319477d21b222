//! The form for recording a new transaction.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error, endpoints,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_error, submit_button, text_input},
    money::Amount,
    transaction::core::{
        CATEGORY_MAX_LENGTH, NewTransaction, TITLE_MAX_LENGTH, TransactionType,
    },
    validation::{check, parse_date, validate_text},
};

/// The raw transaction details as entered in the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFormData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub amount: String,
    /// Either "income" or "expense".
    #[serde(default)]
    pub transaction_type: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFieldErrors {
    pub title: Option<String>,
    pub amount: Option<String>,
    pub transaction_type: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
}

impl TransactionFieldErrors {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// New transactions must move some money.
fn parse_positive_amount(raw_amount: &str) -> Result<Amount, Error> {
    let amount = Amount::parse(raw_amount)?;

    if amount.is_zero() {
        return Err(Error::InvalidAmount(
            "Amount must be greater than zero.".to_owned(),
        ));
    }

    Ok(amount)
}

impl TransactionFormData {
    /// Validate every field, collecting all the errors.
    pub fn validate(&self) -> Result<NewTransaction, TransactionFieldErrors> {
        let mut errors = TransactionFieldErrors::default();

        let title = check(
            validate_text(&self.title, "title", TITLE_MAX_LENGTH, true),
            &mut errors.title,
        );
        let amount = check(parse_positive_amount(&self.amount), &mut errors.amount);
        let transaction_type = check(
            self.transaction_type.parse::<TransactionType>().map(Some),
            &mut errors.transaction_type,
        );
        let date = check(parse_date(&self.date, "date").map(Some), &mut errors.date);
        let category = check(
            validate_text(&self.category, "category", CATEGORY_MAX_LENGTH, true),
            &mut errors.category,
        );

        match (transaction_type, date) {
            (Some(transaction_type), Some(date)) if errors.is_empty() => Ok(NewTransaction {
                title,
                amount,
                transaction_type,
                date,
                category,
            }),
            _ => Err(errors),
        }
    }
}

/// The form for a new transaction, prefilled with `values`.
pub fn transaction_form(values: &TransactionFormData, errors: &TransactionFieldErrors) -> Markup {
    let selected_type = values.transaction_type.as_str();

    html! {
        form
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "New Transaction" }

            (text_input("title", "Title", "text", &values.title, true, errors.title.as_deref()))

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    value=(values.amount)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.amount.as_deref()))
            }

            div
            {
                label for="transaction_type" class=(FORM_LABEL_STYLE) { "Type" }

                select
                    name="transaction_type"
                    id="transaction_type"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for transaction_type in [TransactionType::Expense, TransactionType::Income] {
                        option
                            value=(transaction_type.as_str())
                            selected[selected_type == transaction_type.as_str()]
                        {
                            (transaction_type.label())
                        }
                    }
                }

                (field_error(errors.transaction_type.as_deref()))
            }

            (text_input("date", "Date", "date", &values.date, true, errors.date.as_deref()))
            (text_input("category", "Category", "text", &values.category, true, errors.category.as_deref()))

            (submit_button("Add Transaction"))
        }
    }
}

/// Empty form values with the date set to `today`.
pub fn default_form_data(today: Date) -> TransactionFormData {
    TransactionFormData {
        transaction_type: TransactionType::Expense.as_str().to_owned(),
        date: today.to_string(),
        ..Default::default()
    }
}
