//! Dismissible success and error messages.
//!
//! Alerts are returned by htmx endpoints and swapped into the
//! `#alert-container` element of the page.

use maud::{Markup, html};

const SUCCESS_STYLE: &str = "flex items-start p-4 mb-4 text-green-800 rounded-lg \
    bg-green-50 dark:bg-gray-800 dark:text-green-400 border border-green-300 \
    dark:border-green-800";

const ERROR_STYLE: &str = "flex items-start p-4 mb-4 text-red-800 rounded-lg \
    bg-red-50 dark:bg-gray-800 dark:text-red-400 border border-red-300 \
    dark:border-red-800";

/// A message to show the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The requested operation succeeded.
    Success {
        /// The headline of the alert.
        message: String,
        /// Extra information, may be empty.
        details: String,
    },
    /// The requested operation failed.
    Error {
        /// The headline of the alert.
        message: String,
        /// What went wrong and how to fix it, may be empty.
        details: String,
    },
}

impl Alert {
    fn style(&self) -> &'static str {
        match self {
            Alert::Success { .. } => SUCCESS_STYLE,
            Alert::Error { .. } => ERROR_STYLE,
        }
    }

    /// The alert as an element that fills and reveals the alert container.
    pub fn into_html(self) -> Markup {
        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                (self.inline_html())
            }
        }
    }

    /// The alert as an element that sits in the normal flow of the page.
    pub fn inline_html(&self) -> Markup {
        let (message, details) = match self {
            Alert::Success { message, details } | Alert::Error { message, details } => {
                (message, details)
            }
        };

        html! {
            div class=(self.style()) role="alert"
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty()
                    {
                        p class="mt-1 text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-3 text-sm font-medium"
                    aria-label="Close"
                    onclick="this.parentElement.remove()"
                {
                    "✕"
                }
            }
        }
    }
}
