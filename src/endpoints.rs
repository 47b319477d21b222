//! The URIs of the pages and API routes.
//!
//! Page routes return full HTML documents. Routes under `/api` are posted to
//! by htmx and return fragments or `HX-Redirect` headers.

/// The public landing page.
pub const ROOT: &str = "/";
/// The summary page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The staff-only overview of the whole site.
pub const ADMIN_DASHBOARD_VIEW: &str = "/admin-dashboard";
/// The page for editing the current user's profile.
pub const PROFILE_VIEW: &str = "/profile";
/// The page for displaying a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transaction/add";
/// The page for displaying a user's goals.
pub const GOALS_VIEW: &str = "/goals";
/// The page for creating a new goal.
pub const NEW_GOAL_VIEW: &str = "/goal/add";
/// The route for downloading a user's transactions as a spreadsheet.
pub const TRANSACTIONS_REPORT: &str = "/generate-report";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register users.
pub const USERS: &str = "/api/users";
/// The route to update the current user's profile.
pub const PROFILE_API: &str = "/api/profile";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to create goals.
pub const GOALS_API: &str = "/api/goals";
