//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::{DashboardSummary, summarize},
        cards::{goal_progress_view, summary_cards_view},
        charts::{
            DashboardChart, charts_script, charts_view, expense_breakdown_chart,
            monthly_expenses_chart,
        },
    },
    endpoints,
    flash::{FlashMessage, take_flash},
    goal::get_goals_for_user,
    html::{HeadElement, LINK_STYLE, base},
    navigation::NavBar,
    timezone::get_local_date,
    transaction::{Transaction, get_transactions_for_user, transaction_table},
    user::{User, UserID, get_user_by_id},
};

/// How many transactions are listed under "Recent Transactions".
const RECENT_TRANSACTION_COUNT: usize = 5;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub cookie_key: Key,
    /// The database connection for reading transactions and goals.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl FromRef<DashboardState> for Key {
    fn from_ref(state: &DashboardState) -> Self {
        state.cookie_key.clone()
    }
}

/// Display a page with an overview of the logged in user's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let (user, transactions, goals) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let user = get_user_by_id(user_id, &connection)?;
        let transactions = get_transactions_for_user(user_id, &connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
        let goals = get_goals_for_user(user_id, &connection)
            .inspect_err(|error| tracing::error!("could not get goals: {error}"))?;

        (user, transactions, goals)
    };

    let summary = summarize(&transactions, &goals, today);
    let recent_transactions = &transactions[..transactions.len().min(RECENT_TRANSACTION_COUNT)];

    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        dashboard_view(&user, &summary, recent_transactions, flash),
    )
        .into_response())
}

/// Serializes the chart options for the summary.
fn build_dashboard_charts(summary: &DashboardSummary) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "expense-breakdown-chart",
            options: expense_breakdown_chart(&summary.expense_breakdown).to_string(),
        },
        DashboardChart {
            id: "monthly-expenses-chart",
            options: monthly_expenses_chart(&summary.monthly_expenses).to_string(),
        },
    ]
}

fn recent_transactions_view(recent_transactions: &[Transaction]) -> Markup {
    html! {
        section class="w-full mb-8"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Recent Transactions" }

                div class="flex gap-4"
                {
                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "Add Transaction" }
                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "View all" }
                }
            }

            div class="overflow-x-auto rounded bg-gray-50 dark:bg-gray-800"
            {
                (transaction_table(
                    recent_transactions,
                    "No transactions yet. Charts will show up here once you add some.",
                ))
            }
        }
    }
}

fn dashboard_view(
    user: &User,
    summary: &DashboardSummary,
    recent_transactions: &[Transaction],
    flash: Option<FlashMessage>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, user.is_staff).into_html();
    let charts = build_dashboard_charts(summary);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            @if let Some(flash) = flash {
                div class="w-full mb-4" { (flash.into_html()) }
            }

            h1 class="w-full text-2xl font-bold mb-4"
            {
                "Welcome back, " (user.display_name())
            }

            (summary_cards_view(summary))
            (charts_view(&charts))
            (goal_progress_view(&summary.goal_progress))
            (recent_transactions_view(recent_transactions))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}
