//! Defines the route handler for the page for creating a new goal.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    goal::form::{GoalFieldErrors, GoalFormData, goal_form},
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::get_local_date,
    user::{UserID, get_user_by_id},
};

fn create_goal_view(today: Date, is_staff: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_GOAL_VIEW, is_staff).into_html();
    let form = goal_form(&GoalFormData::default(), &GoalFieldErrors::default(), today);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (form)
        }
    };

    base("Add Goal", &[], &content)
}

/// The state needed for the new goal page.
#[derive(Debug, Clone)]
pub struct CreateGoalPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for creating a goal.
pub async fn get_create_goal_page(
    State(state): State<CreateGoalPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let user = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_id(user_id, &connection)?
    };

    let today = get_local_date(&state.local_timezone)?;

    Ok(create_goal_view(today, user.is_staff).into_response())
}

#[cfg(test)]
mod view_tests {
    use axum::{
        Extension,
        extract::{FromRef, State},
    };
    use scraper::Selector;
    use time::OffsetDateTime;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, create_test_user, get_test_state, must_get_form,
            parse_html_document,
        },
    };

    use super::{CreateGoalPageState, get_create_goal_page};

    #[tokio::test]
    async fn new_goal_returns_form() {
        let app_state = get_test_state();
        let user = create_test_user("ada", &app_state.db_connection.lock().unwrap());
        let state = CreateGoalPageState::from_ref(&app_state);

        let response = get_create_goal_page(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::GOALS_API, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "target_amount", "number");
        assert_form_input(&form, "deadline", "date");
        assert_form_submit_button(&form);

        let deadline_selector = Selector::parse("input[name=deadline]").unwrap();
        let deadline = form.select(&deadline_selector).next().unwrap();
        assert_eq!(
            deadline.value().attr("min"),
            Some(OffsetDateTime::now_utc().date().to_string().as_str())
        );
    }
}
