//! The profile fields shared by the registration and profile forms.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_error, text_input},
    user::core::{
        BIO_MAX_LENGTH, NAME_MAX_LENGTH, PHONE_NUMBER_MAX_LENGTH, ProfileUpdate,
        validate_email, validate_username,
    },
    validation::{check, parse_date, validate_text},
};

/// The raw profile details as entered in a form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    /// A date in the format "YYYY-MM-DD", or empty.
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub bio: String,
}

/// The error message for each field that failed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFieldErrors {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub bio: Option<String>,
}

impl ProfileFieldErrors {
    /// Whether every field passed validation.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_date_of_birth(raw_date: &str) -> Result<Option<Date>, Error> {
    if raw_date.trim().is_empty() {
        return Ok(None);
    }

    parse_date(raw_date, "date of birth").map(Some)
}

fn optional(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

impl ProfileFields {
    /// Validate every field, collecting all the errors rather than stopping
    /// at the first.
    ///
    /// First and last names are only mandatory when `names_required`.
    pub fn validate(&self, names_required: bool) -> Result<ProfileUpdate, ProfileFieldErrors> {
        let mut errors = ProfileFieldErrors::default();

        let username = check(validate_username(&self.username), &mut errors.username);
        let email = check(validate_email(&self.email), &mut errors.email);
        let first_name = check(
            validate_text(&self.first_name, "first name", NAME_MAX_LENGTH, names_required),
            &mut errors.first_name,
        );
        let last_name = check(
            validate_text(&self.last_name, "last name", NAME_MAX_LENGTH, names_required),
            &mut errors.last_name,
        );
        let phone_number = check(
            validate_text(
                &self.phone_number,
                "phone number",
                PHONE_NUMBER_MAX_LENGTH,
                false,
            ),
            &mut errors.phone_number,
        );
        let date_of_birth = check(
            parse_date_of_birth(&self.date_of_birth),
            &mut errors.date_of_birth,
        );
        let bio = check(
            validate_text(&self.bio, "bio", BIO_MAX_LENGTH, false),
            &mut errors.bio,
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProfileUpdate {
            username,
            email,
            first_name,
            last_name,
            phone_number: optional(phone_number),
            date_of_birth,
            bio,
        })
    }
}

/// Put a storage error about a duplicate username or email on its field.
///
/// Returns the error back if it does not belong to a field.
pub fn assign_duplicate_error(error: Error, errors: &mut ProfileFieldErrors) -> Result<(), Error> {
    match error {
        Error::DuplicateUsername(_) => {
            errors.username = Some("A user with that username already exists.".to_owned());
            Ok(())
        }
        Error::DuplicateEmail(_) => {
            errors.email = Some("A user with that email already exists.".to_owned());
            Ok(())
        }
        error => Err(error),
    }
}

/// The inputs for the profile fields, prefilled with `values`.
pub fn profile_inputs(
    values: &ProfileFields,
    errors: &ProfileFieldErrors,
    names_required: bool,
) -> Markup {
    html! {
        (text_input("username", "Username", "text", &values.username, true, errors.username.as_deref()))
        (text_input("email", "Email", "email", &values.email, true, errors.email.as_deref()))

        div class="grid grid-cols-2 gap-4"
        {
            (text_input("first_name", "First name", "text", &values.first_name, names_required, errors.first_name.as_deref()))
            (text_input("last_name", "Last name", "text", &values.last_name, names_required, errors.last_name.as_deref()))
        }

        (text_input("phone_number", "Phone number", "tel", &values.phone_number, false, errors.phone_number.as_deref()))
        (text_input("date_of_birth", "Date of birth", "date", &values.date_of_birth, false, errors.date_of_birth.as_deref()))

        div
        {
            label for="bio" class=(FORM_LABEL_STYLE) { "Bio" }

            textarea
                name="bio"
                id="bio"
                rows="3"
                maxlength=(BIO_MAX_LENGTH)
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (values.bio)
            }

            (field_error(errors.bio.as_deref()))
        }
    }
}
