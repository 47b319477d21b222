//! The user model and its storage.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, PasswordHash};

/// The fewest characters a username may have.
pub const USERNAME_MIN_LENGTH: usize = 3;
/// The most characters a username may have.
pub const USERNAME_MAX_LENGTH: usize = 150;
/// The most characters a first or last name may have.
pub const NAME_MAX_LENGTH: usize = 30;
/// The most characters a phone number may have.
pub const PHONE_NUMBER_MAX_LENGTH: usize = 15;
/// The most characters a bio may have.
pub const BIO_MAX_LENGTH: usize = 500;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's unique email address.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// The user's first name, may be empty.
    pub first_name: String,
    /// The user's last name, may be empty.
    pub last_name: String,
    /// The user's phone number.
    pub phone_number: Option<String>,
    /// The user's date of birth.
    pub date_of_birth: Option<Date>,
    /// A short description the user wrote about themselves.
    pub bio: String,
    /// Whether the user can see the admin dashboard.
    pub is_staff: bool,
    /// Inactive users cannot log in.
    pub is_active: bool,
    /// When the user registered, in UTC.
    pub date_joined: OffsetDateTime,
    /// When the user's profile was last changed, in UTC.
    pub updated_at: OffsetDateTime,
}

impl User {
    /// The user's full name, or their username if they have not given a name.
    pub fn display_name(&self) -> String {
        let full_name = format!("{} {}", self.first_name, self.last_name);
        let full_name = full_name.trim();

        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name.to_owned()
        }
    }
}

/// The details needed to register a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<Date>,
    pub bio: String,
}

/// The details a user can change on their profile page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<Date>,
    pub bio: String,
}

/// Check that `raw_username` is 3 to 150 letters, digits or `@.+-_`.
///
/// Leading and trailing whitespace is removed first.
///
/// # Errors
/// Returns an [Error::InvalidUsername] describing the broken rule.
pub fn validate_username(raw_username: &str) -> Result<String, Error> {
    let username = raw_username.trim();
    let length = username.chars().count();

    if length < USERNAME_MIN_LENGTH {
        return Err(Error::InvalidUsername(format!(
            "Username must be at least {USERNAME_MIN_LENGTH} characters."
        )));
    }

    if length > USERNAME_MAX_LENGTH {
        return Err(Error::InvalidUsername(format!(
            "Username must be at most {USERNAME_MAX_LENGTH} characters."
        )));
    }

    let is_allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(is_allowed) {
        return Err(Error::InvalidUsername(
            "Username may only contain letters, digits and @/./+/-/_ characters.".to_owned(),
        ));
    }

    Ok(username.to_owned())
}

/// Check that `raw_email` is a valid email address and return the bare address.
///
/// # Errors
/// Returns an [Error::InvalidEmail] if the address cannot be parsed.
pub fn validate_email(raw_email: &str) -> Result<String, Error> {
    let raw_email = raw_email.trim();

    EmailAddress::from_str(raw_email)
        .map(|email| email.email())
        .map_err(|_| Error::InvalidEmail(raw_email.to_owned()))
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                phone_number TEXT,
                date_of_birth TEXT,
                bio TEXT NOT NULL DEFAULT '',
                is_staff INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                date_joined TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

const USER_COLUMNS: &str = "id, username, email, password, first_name, last_name, \
    phone_number, date_of_birth, bio, is_staff, is_active, date_joined, updated_at";

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: UserID::new(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        first_name: row.get(4)?,
        last_name: row.get(5)?,
        phone_number: row.get(6)?,
        date_of_birth: row.get(7)?,
        bio: row.get(8)?,
        is_staff: row.get(9)?,
        is_active: row.get(10)?,
        date_joined: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

/// Convert UNIQUE constraint failures on the user table into domain errors.
fn map_unique_violation(error: rusqlite::Error, username: &str, email: &str) -> Error {
    match error {
        // Code 2067 occurs when a UNIQUE constraint failed.
        rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
            if sql_error.extended_code == 2067 && desc.contains("user.username") =>
        {
            Error::DuplicateUsername(username.to_owned())
        }
        rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
            if sql_error.extended_code == 2067 && desc.contains("user.email") =>
        {
            Error::DuplicateEmail(email.to_owned())
        }
        error => error.into(),
    }
}

/// Create and insert a new user into the database.
///
/// New users are active and not staff.
///
/// # Errors
///
/// Returns a [Error::DuplicateUsername] or [Error::DuplicateEmail] if another
/// user already has the username or email, or [Error::SqlError] for other SQL
/// errors.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .prepare(&format!(
            "INSERT INTO user (username, email, password, first_name, last_name, \
                phone_number, date_of_birth, bio, date_joined, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            (
                &new_user.username,
                &new_user.email,
                &new_user.password_hash,
                &new_user.first_name,
                &new_user.last_name,
                &new_user.phone_number,
                new_user.date_of_birth,
                &new_user.bio,
                now,
            ),
            map_user_row,
        )
        .map_err(|error| map_unique_violation(error, &new_user.username, &new_user.email))
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered
/// user, or an [Error::SqlError] if there was an SQL error.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user with the username `username`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if there is no such user, or an
/// [Error::SqlError] if there was an SQL error.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "SELECT {USER_COLUMNS} FROM user WHERE username = :username"
        ))?
        .query_row(&[(":username", username)], map_user_row)
        .map_err(|error| error.into())
}

/// Replace the profile details of `user_id` and refresh its `updated_at` time.
///
/// # Errors
///
/// Returns an [Error::NotFound] if the user does not exist, a
/// [Error::DuplicateUsername] or [Error::DuplicateEmail] if the new username
/// or email belong to someone else, or an [Error::SqlError] otherwise.
pub fn update_profile(
    user_id: UserID,
    update: &ProfileUpdate,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "UPDATE user SET username = ?1, email = ?2, first_name = ?3, last_name = ?4, \
                phone_number = ?5, date_of_birth = ?6, bio = ?7, updated_at = ?8
            WHERE id = ?9
            RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            (
                &update.username,
                &update.email,
                &update.first_name,
                &update.last_name,
                &update.phone_number,
                update.date_of_birth,
                &update.bio,
                OffsetDateTime::now_utc(),
                user_id.as_i64(),
            ),
            map_user_row,
        )
        .map_err(|error| map_unique_violation(error, &update.username, &update.email))
}

/// Set the password of the user with `username`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if there is no such user, or an
/// [Error::SqlError] if there was an SQL error.
pub fn update_password(
    username: &str,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1, updated_at = ?2 WHERE username = ?3",
        (password_hash, OffsetDateTime::now_utc(), username),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Grant or revoke staff privileges for the user with `username`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if there is no such user, or an
/// [Error::SqlError] if there was an SQL error.
pub fn set_staff_status(
    username: &str,
    is_staff: bool,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "UPDATE user SET is_staff = ?1 WHERE username = ?2 RETURNING {USER_COLUMNS}"
        ))?
        .query_row((is_staff, username), map_user_row)
        .map_err(|error| error.into())
}
