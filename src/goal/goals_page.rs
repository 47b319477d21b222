//! Defines the route handler for the page that lists the user's goals.

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
    goal::core::{Goal, get_goals_for_user},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
    user::{UserID, get_user_by_id},
};

fn goals_view(goals: &[Goal], is_staff: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::GOALS_VIEW, is_staff).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full space-y-4 lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Goals" }

                    a href=(endpoints::NEW_GOAL_VIEW) class=(LINK_STYLE) { "Add Goal" }
                }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Your balance is put towards goals from top to bottom."
                }

                div class="overflow-x-auto rounded bg-gray-50 dark:bg-gray-800"
                {
                    table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class="px-6 py-3 text-right" { "Target" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Deadline" }
                            }
                        }

                        tbody
                        {
                            @for goal in goals {
                                tr class=(TABLE_ROW_STYLE) data-goal-row="true"
                                {
                                    td class=(TABLE_CELL_STYLE) { (goal.name) }
                                    td class="px-6 py-4 text-right"
                                    {
                                        (format_currency(goal.target_amount.as_decimal()))
                                    }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        time datetime=(goal.deadline) { (goal.deadline) }
                                    }
                                }
                            }

                            @if goals.is_empty() {
                                tr
                                {
                                    td colspan="3" data-empty-state="true" class="px-6 py-4 text-center"
                                    {
                                        "No goals yet. Set one to start saving."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Goals", &[], &content)
}

/// The state needed for the goals page.
#[derive(Debug, Clone)]
pub struct GoalsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the logged in user's goals in the order they are funded.
pub async fn get_goals_page(
    State(state): State<GoalsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)?;
    let goals = get_goals_for_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get goals: {error}"))?;

    Ok(goals_view(&goals, user.is_staff).into_response())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use axum::{
        Extension,
        extract::{FromRef, State},
    };
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        goal::core::{NewGoal, create_goal},
        money::Amount,
        test_utils::{
            assert_status_ok, assert_valid_html, create_test_user, get_test_state,
            parse_html_document, select_text,
        },
    };

    use super::{GoalsPageState, get_goals_page};

    #[tokio::test]
    async fn lists_goals_in_creation_order() {
        let app_state = get_test_state();
        let user = {
            let connection = app_state.db_connection.lock().unwrap();
            let user = create_test_user("ada", &connection);
            for (name, target) in [("Car", "8000"), ("Holiday", "1234.5")] {
                create_goal(
                    user.id,
                    NewGoal {
                        name: name.to_owned(),
                        target_amount: Amount::new(Decimal::from_str(target).unwrap()).unwrap(),
                        deadline: date!(2027 - 12 - 31),
                    },
                    &connection,
                )
                .unwrap();
            }
            user
        };
        let state = GoalsPageState::from_ref(&app_state);

        let response = get_goals_page(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert_eq!(
            select_text(&document, "tr[data-goal-row] td:nth-child(1)"),
            ["Car", "Holiday"]
        );
        assert_eq!(
            select_text(&document, "tr[data-goal-row] td:nth-child(2)"),
            ["$8,000.00", "$1,234.50"]
        );
    }

    #[tokio::test]
    async fn shows_empty_state() {
        let app_state = get_test_state();
        let user = create_test_user("ada", &app_state.db_connection.lock().unwrap());
        let state = GoalsPageState::from_ref(&app_state);

        let response = get_goals_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert_eq!(select_text(&document, "td[data-empty-state]").len(), 1);
    }
}
