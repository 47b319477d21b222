//! The registration page for creating a new account.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    auth::{PASSWORD_MIN_LENGTH, set_auth_cookie},
    endpoints,
    flash::{FlashMessage, set_flash},
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base, field_error, log_in_register,
        password_input, submit_button,
    },
    internal_server_error::get_internal_server_error_redirect,
    timezone::get_local_offset,
    user::{
        core::{NewUser, create_user},
        form::{ProfileFieldErrors, ProfileFields, assign_duplicate_error, profile_inputs},
    },
    validation::error_message,
};

const PASSWORD_MISMATCH_ERROR_MSG: &str = "Passwords do not match.";

/// The error messages for a registration form that failed validation.
#[derive(Debug, Default)]
struct RegistrationErrors {
    profile: ProfileFieldErrors,
    password: Option<String>,
    confirm_password: Option<String>,
}

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="confirm-password" class=(FORM_LABEL_STYLE)
            {
                "Confirm password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()];

            (field_error(error_message))
        }
    }
}

fn registration_form(values: &ProfileFields, errors: &RegistrationErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (profile_inputs(values, &errors.profile, true))
            (password_input("", PASSWORD_MIN_LENGTH, errors.password.as_deref()))
            (confirm_password_input(PASSWORD_MIN_LENGTH, errors.confirm_password.as_deref()))

            (submit_button("Create account"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form =
        registration_form(&ProfileFields::default(), &RegistrationErrors::default());
    let content = log_in_register("Create an account", &registration_form);

    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The data entered in the registration form.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    #[serde(flatten)]
    pub profile: ProfileFields,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Check the passwords match and the password is hard enough to guess.
///
/// The username and email count as guessable input.
fn validate_passwords(
    form: &RegisterForm,
    errors: &mut RegistrationErrors,
) -> Option<ValidatedPassword> {
    if form.password != form.confirm_password {
        errors.confirm_password = Some(PASSWORD_MISMATCH_ERROR_MSG.to_owned());
        return None;
    }

    let user_inputs = [form.profile.username.as_str(), form.profile.email.as_str()];

    ValidatedPassword::new(&form.password, &user_inputs)
        .inspect_err(|error| errors.password = Some(error_message(error)))
        .ok()
}

/// Create a new user, log them in and redirect to the dashboard.
///
/// Invalid input and taken usernames or emails re-render the form with the
/// error messages next to the offending fields.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let mut errors = RegistrationErrors::default();

    let profile = form
        .profile
        .validate(true)
        .inspect_err(|field_errors| errors.profile = field_errors.clone())
        .ok();
    let password = validate_passwords(&form, &mut errors);

    let (Some(profile), Some(password)) = (profile, password) else {
        return registration_form(&form.profile, &errors).into_response();
    };

    let password_hash = match PasswordHash::new(password, PasswordHash::DEFAULT_COST) {
        Ok(password_hash) => password_hash,
        Err(error) => {
            tracing::error!("Could not hash password: {error}");
            return get_internal_server_error_redirect();
        }
    };

    let new_user = NewUser {
        username: profile.username,
        email: profile.email,
        password_hash,
        first_name: profile.first_name,
        last_name: profile.last_name,
        phone_number: profile.phone_number,
        date_of_birth: profile.date_of_birth,
        bio: profile.bio,
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => create_user(new_user, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let user = match result {
        Ok(user) => user,
        Err(error) => {
            return match assign_duplicate_error(error, &mut errors.profile) {
                Ok(()) => registration_form(&form.profile, &errors).into_response(),
                Err(error) => {
                    tracing::error!("Could not create user: {error}");
                    get_internal_server_error_redirect()
                }
            };
        }
    };

    tracing::info!("Registered user {} ({})", user.username, user.id);

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return get_internal_server_error_redirect();
    };

    let jar = match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            return get_internal_server_error_redirect();
        }
    };
    let jar = set_flash(
        jar,
        &FlashMessage::success("Registration successful. You are now logged in."),
    );

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        jar,
    )
        .into_response()
}
