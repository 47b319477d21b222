//! The public home page.

use axum::response::{IntoResponse, Response};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    auth::has_valid_auth_cookie,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, base},
};

fn landing_view(is_logged_in: bool) -> Markup {
    let content = html! {
        main class="flex flex-col items-center justify-center min-h-screen px-6 py-8 mx-auto text-center text-gray-900 dark:text-white"
        {
            h1 class="mb-4 text-4xl font-extrabold tracking-tight md:text-5xl"
            {
                "Finance Tracker"
            }

            p class="max-w-xl mb-8 text-lg text-gray-600 dark:text-gray-400"
            {
                "Record your income and expenses, set savings goals and see where
                your money goes."
            }

            div class="flex gap-4"
            {
                @if is_logged_in {
                    a href=(endpoints::DASHBOARD_VIEW) class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Go to dashboard"
                    }
                } @else {
                    a href=(endpoints::REGISTER_VIEW) class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Get started"
                    }
                    a href=(endpoints::LOG_IN_VIEW) class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Log in"
                    }
                }
            }
        }
    };

    base("Welcome", &[], &content)
}

/// The landing page. Logged in users get a link to their dashboard.
pub async fn get_landing_page(jar: PrivateCookieJar) -> Response {
    landing_view(has_valid_auth_cookie(&jar)).into_response()
}
