//! Checks shared by the forms for users, transactions and goals.

use time::{Date, macros::format_description};

use crate::Error;

/// Check the length of a free text field.
///
/// # Errors
/// Returns [Error::EmptyText] for an empty `required` field and
/// [Error::TextTooLong] when `text` has more than `max_length` characters.
pub fn validate_text(
    text: &str,
    field: &'static str,
    max_length: usize,
    required: bool,
) -> Result<String, Error> {
    let text = text.trim();

    if required && text.is_empty() {
        return Err(Error::EmptyText(field));
    }

    if text.chars().count() > max_length {
        return Err(Error::TextTooLong { field, max_length });
    }

    Ok(text.to_owned())
}

/// Parse a date entered as "YYYY-MM-DD", the format of HTML date inputs.
///
/// # Errors
/// Returns [Error::EmptyText] for a blank date and [Error::InvalidDate] for
/// anything else that is not a date.
pub fn parse_date(raw_date: &str, field: &'static str) -> Result<Date, Error> {
    let raw_date = raw_date.trim();

    if raw_date.is_empty() {
        return Err(Error::EmptyText(field));
    }

    Date::parse(raw_date, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(raw_date.to_owned()))
}

/// Record the message of a failed check in `slot` and carry on with a
/// placeholder value, so every field of a form gets checked.
pub fn check<T: Default>(result: Result<T, Error>, slot: &mut Option<String>) -> T {
    result.unwrap_or_else(|error| {
        *slot = Some(error_message(&error));
        T::default()
    })
}

/// The message shown to the user under the offending field.
pub fn error_message(error: &Error) -> String {
    let message = error.to_string();
    let mut chars = message.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => message,
    }
}
