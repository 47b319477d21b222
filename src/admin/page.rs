//! The staff-only dashboard with an overview of the whole site.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use time::macros::format_description;

use crate::{
    AppState, Error,
    admin::stats::{RecentTransaction, RecentUser, SiteStats, get_site_stats},
    endpoints,
    flash::{FlashMessage, set_flash},
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    user::{UserID, get_user_by_id},
};

const ACCESS_DENIED_MSG: &str = "Access denied. Staff privileges required.";

const TABLE_STYLE: &str = "w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400";

/// The state needed for the admin dashboard.
#[derive(Debug, Clone)]
pub struct AdminDashboardState {
    pub cookie_key: Key,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AdminDashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<AdminDashboardState> for Key {
    fn from_ref(state: &AdminDashboardState) -> Self {
        state.cookie_key.clone()
    }
}

fn stat_card(label: &str, value: i64) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700 rounded-lg p-4 shadow-md"
            data-stat=(label)
        {
            p class="text-sm text-gray-600 dark:text-gray-400" { (label) }
            p class="text-2xl font-bold" { (value) }
        }
    }
}

fn recent_users_table(users: &[RecentUser]) -> Markup {
    let date_format = format_description!("[year]-[month]-[day] [hour]:[minute]");

    html! {
        table class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Username" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Email" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Joined (UTC)" }
                }
            }

            tbody
            {
                @for user in users {
                    tr class=(TABLE_ROW_STYLE) data-recent-user="true"
                    {
                        td class=(TABLE_CELL_STYLE) { (user.username) }
                        td class=(TABLE_CELL_STYLE) { (user.email) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            (user.date_joined.format(date_format).unwrap_or_default())
                        }
                    }
                }
            }
        }
    }
}

fn recent_transactions_table(transactions: &[RecentTransaction]) -> Markup {
    html! {
        table class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "User" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                    th scope="col" class="px-6 py-3 text-right" { "Amount" }
                }
            }

            tbody
            {
                @for transaction in transactions {
                    tr class=(TABLE_ROW_STYLE) data-recent-transaction="true"
                    {
                        td class=(TABLE_CELL_STYLE) { (transaction.date) }
                        td class=(TABLE_CELL_STYLE) { (transaction.username) }
                        td class=(TABLE_CELL_STYLE) { (transaction.title) }
                        td class=(TABLE_CELL_STYLE) { (transaction.transaction_type.label()) }
                        td class="px-6 py-4 text-right"
                        {
                            (format_currency(transaction.amount.as_decimal()))
                        }
                    }
                }
            }
        }
    }
}

fn admin_dashboard_view(stats: &SiteStats) -> Markup {
    let nav_bar = NavBar::new(endpoints::ADMIN_DASHBOARD_VIEW, true).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full space-y-6 lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Admin Dashboard" }

                div class="grid grid-cols-2 lg:grid-cols-3 gap-4"
                {
                    (stat_card("Total Users", stats.total_users))
                    (stat_card("Active Users", stats.active_users))
                    (stat_card("Total Transactions", stats.total_transactions))
                    (stat_card("Total Goals", stats.total_goals))
                    (stat_card("Users With Transactions", stats.users_with_transactions))
                    (stat_card("Users With Goals", stats.users_with_goals))
                }

                div
                {
                    h2 class="text-lg font-semibold" { "Newest Users" }
                    div class="overflow-x-auto rounded bg-gray-50 dark:bg-gray-800"
                    {
                        (recent_users_table(&stats.recent_users))
                    }
                }

                div
                {
                    h2 class="text-lg font-semibold" { "Latest Transactions" }
                    div class="overflow-x-auto rounded bg-gray-50 dark:bg-gray-800"
                    {
                        (recent_transactions_table(&stats.recent_transactions))
                    }
                }
            }
        }
    };

    base("Admin Dashboard", &[], &content)
}

/// Show site-wide statistics to staff.
///
/// Everyone else is sent back to their own dashboard with an error message.
pub async fn get_admin_dashboard_page(
    State(state): State<AdminDashboardState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)?;

    if !user.is_staff {
        tracing::warn!(
            "user {} tried to open the admin dashboard without staff status",
            user.username
        );
        let jar = set_flash(jar, &FlashMessage::error(ACCESS_DENIED_MSG));

        return Ok((jar, Redirect::to(endpoints::DASHBOARD_VIEW)).into_response());
    }

    let stats = get_site_stats(&connection)
        .inspect_err(|error| tracing::error!("could not get site statistics: {error}"))?;

    Ok(admin_dashboard_view(&stats).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{FromRef, State},
    };
    use axum_extra::extract::PrivateCookieJar;

    use crate::{
        endpoints,
        test_utils::{
            assert_redirect, assert_status_ok, assert_valid_html, create_test_user,
            get_test_state, parse_html_document, select_text,
        },
        user::set_staff_status,
    };

    use super::{AdminDashboardState, get_admin_dashboard_page};

    #[tokio::test]
    async fn staff_see_site_statistics() {
        let app_state = get_test_state();
        let admin = {
            let connection = app_state.db_connection.lock().unwrap();
            let admin = create_test_user("admin", &connection);
            create_test_user("ada", &connection);
            set_staff_status("admin", true, &connection).unwrap();
            admin
        };
        let state = AdminDashboardState::from_ref(&app_state);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = get_admin_dashboard_page(State(state), Extension(admin.id), jar)
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert_eq!(
            select_text(&document, "[data-stat='Total Users'] p:nth-child(2)"),
            ["2"]
        );
        assert_eq!(
            select_text(&document, "tr[data-recent-user] td:nth-child(1)"),
            ["ada", "admin"]
        );
    }

    #[tokio::test]
    async fn non_staff_are_redirected_with_flash() {
        let app_state = get_test_state();
        let user = create_test_user("ada", &app_state.db_connection.lock().unwrap());
        let state = AdminDashboardState::from_ref(&app_state);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = get_admin_dashboard_page(State(state), Extension(user.id), jar)
            .await
            .unwrap();

        assert_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert!(
            response
                .headers()
                .get_all("set-cookie")
                .iter()
                .any(|header| header.to_str().unwrap().starts_with("flash="))
        );
    }
}
