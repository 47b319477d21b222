//! One-shot messages that survive a redirect.
//!
//! A handler that redirects after a change stores a [FlashMessage] in a
//! private cookie. The page the user lands on takes the message out of the
//! cookie jar, which also deletes the cookie, and shows it once.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use maud::Markup;
use serde::{Deserialize, Serialize};

use crate::alert::Alert;

const COOKIE_FLASH: &str = "flash";

/// Whether the flash message reports a success or a failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlashLevel {
    Success,
    Error,
}

/// A message to show on the next page the user visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: &str) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.to_owned(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.to_owned(),
        }
    }

    /// The message as an alert in the flow of the page.
    pub fn into_html(self) -> Markup {
        let alert = match self.level {
            FlashLevel::Success => Alert::Success {
                message: self.message,
                details: String::new(),
            },
            FlashLevel::Error => Alert::Error {
                message: self.message,
                details: String::new(),
            },
        };

        alert.inline_html()
    }
}

/// Store `flash` in the cookie jar, replacing any earlier message.
pub fn set_flash(jar: PrivateCookieJar, flash: &FlashMessage) -> PrivateCookieJar {
    match serde_json::to_string(flash) {
        Ok(value) => jar.add(
            Cookie::build((COOKIE_FLASH, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(true),
        ),
        Err(error) => {
            tracing::error!("Could not serialize flash message {flash:?}: {error}");
            jar
        }
    }
}

/// Remove the flash message from the cookie jar and return it.
///
/// A cookie that cannot be decoded is deleted and ignored.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<FlashMessage>) {
    let Some(cookie) = jar.get(COOKIE_FLASH) else {
        return (jar, None);
    };

    let flash = serde_json::from_str(cookie.value_trimmed())
        .inspect_err(|error| tracing::warn!("Discarding malformed flash message: {error}"))
        .ok();

    (jar.remove(Cookie::build(COOKIE_FLASH).path("/")), flash)
}
