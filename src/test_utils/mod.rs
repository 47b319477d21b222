#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

use rusqlite::Connection;

use crate::{
    AppState, PasswordHash, ValidatedPassword,
    db::initialize,
    user::{NewUser, User, create_user},
};

pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_input_with_value,
    assert_form_submit_button, assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, select_text};
pub(crate) use http::{
    assert_content_type, assert_hx_redirect, assert_redirect, assert_status_ok, get_header,
};

/// The password of every user made by [create_test_user].
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// The lowest cost bcrypt accepts, to keep tests fast.
const TEST_HASH_COST: u32 = 4;

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");

    connection
}

/// App state over an in-memory database, in UTC.
pub(crate) fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection, "foobar", "Etc/UTC").expect("Could not create app state.")
}

/// Registration details for `username` with [TEST_PASSWORD].
pub(crate) fn new_test_user(username: &str) -> NewUser {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        TEST_HASH_COST,
    )
    .expect("Could not hash test password.");

    NewUser {
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash,
        first_name: String::new(),
        last_name: String::new(),
        phone_number: None,
        date_of_birth: None,
        bio: String::new(),
    }
}

pub(crate) fn create_test_user(username: &str, connection: &Connection) -> User {
    create_user(new_test_user(username), connection).expect("Could not create test user.")
}
