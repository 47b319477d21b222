//! Defines the route handler for the page that displays transactions as a table.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
    transaction::core::{Transaction, TransactionType, get_transactions_for_user},
    user::{UserID, get_user_by_id},
};

fn amount_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "text-green-600 dark:text-green-500",
        TransactionType::Expense => "text-red-600 dark:text-red-500",
    }
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let sign = match transaction.transaction_type {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.title) }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class=(TABLE_CELL_STYLE) { (transaction.transaction_type.label()) }
            td class={ "px-6 py-4 text-right " (amount_class(transaction.transaction_type)) }
            {
                (sign) (format_currency(transaction.amount.as_decimal()))
            }
        }
    }
}

/// A table of `transactions` in the order given.
pub fn transaction_table(transactions: &[Transaction], empty_message: &str) -> Markup {
    html! {
        table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                    th scope="col" class="px-6 py-3 text-right" { "Amount" }
                }
            }

            tbody
            {
                @for transaction in transactions {
                    (transaction_row_view(transaction))
                }

                @if transactions.is_empty() {
                    tr
                    {
                        td colspan="5" data-empty-state="true" class="px-6 py-4 text-center"
                        {
                            (empty_message)
                        }
                    }
                }
            }
        }
    }
}

fn transactions_view(transactions: &[Transaction], is_staff: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW, is_staff).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full space-y-4 lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    div class="flex gap-4"
                    {
                        a href=(endpoints::TRANSACTIONS_REPORT) class=(LINK_STYLE)
                        {
                            "Download Report"
                        }

                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                        {
                            "Add Transaction"
                        }
                    }
                }

                div class="overflow-x-auto rounded bg-gray-50 dark:bg-gray-800"
                {
                    (transaction_table(
                        transactions,
                        "No transactions yet. Add one to get started.",
                    ))
                }
            }
        }
    };

    base("Transactions", &[], &content)
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render every transaction of the logged in user, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)?;
    let transactions = get_transactions_for_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(transactions_view(&transactions, user.is_staff).into_response())
}
