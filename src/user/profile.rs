//! The page where users view and edit their own details.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use time::macros::format_description;

use crate::{
    AppState, Error, endpoints,
    flash::{FlashMessage, set_flash, take_flash},
    html::{FORM_CONTAINER_STYLE, base, submit_button},
    navigation::NavBar,
    user::{
        User, UserID,
        core::{get_user_by_id, update_profile},
        form::{ProfileFieldErrors, ProfileFields, assign_duplicate_error, profile_inputs},
    },
};

/// The state needed for the profile page.
#[derive(Debug, Clone)]
pub struct ProfileState {
    pub cookie_key: Key,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<ProfileState> for Key {
    fn from_ref(state: &ProfileState) -> Self {
        state.cookie_key.clone()
    }
}

impl From<&User> for ProfileFields {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
            date_of_birth: user
                .date_of_birth
                .map(|date| date.to_string())
                .unwrap_or_default(),
            bio: user.bio.clone(),
        }
    }
}

fn profile_form(values: &ProfileFields, errors: &ProfileFieldErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::PROFILE_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            (profile_inputs(values, errors, false))
            (submit_button("Save changes"))
        }
    }
}

fn profile_view(user: &User, flash: Option<FlashMessage>) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROFILE_VIEW, user.is_staff);
    let date_joined = user
        .date_joined
        .format(format_description!("[day] [month repr:short] [year]"))
        .unwrap_or_default();

    let content = html! {
        (nav_bar.into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            @if let Some(flash) = flash {
                (flash.into_html())
            }

            h1 class="text-xl font-bold mb-2" { (user.display_name()) }
            p class="text-sm text-gray-500 dark:text-gray-400 mb-6"
            {
                "Member since " (date_joined)
            }

            (profile_form(&ProfileFields::from(user), &ProfileFieldErrors::default()))
        }
    };

    base("Profile", &[], &content)
}

/// Display the profile of the logged in user along with any flash message.
pub async fn get_profile_page(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let user = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_id(user_id, &connection)?
    };

    let (jar, flash) = take_flash(jar);

    Ok((jar, profile_view(&user, flash)).into_response())
}

/// Save changes to the logged in user's profile.
///
/// On success the client is redirected back to the profile page, otherwise
/// the form is returned with the error messages.
pub async fn update_profile_endpoint(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(fields): Form<ProfileFields>,
) -> Response {
    let update = match fields.validate(false) {
        Ok(update) => update,
        Err(errors) => return profile_form(&fields, &errors).into_response(),
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => update_profile(user_id, &update, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    if let Err(error) = result {
        let mut errors = ProfileFieldErrors::default();

        return match assign_duplicate_error(error, &mut errors) {
            Ok(()) => profile_form(&fields, &errors).into_response(),
            Err(error) => error.into_alert_response(),
        };
    }

    let jar = set_flash(jar, &FlashMessage::success("Profile updated successfully."));

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::PROFILE_VIEW.to_owned()),
        jar,
    )
        .into_response()
}
