//! The staff-only overview of every user's activity.

mod page;
mod stats;

pub use page::get_admin_dashboard_page;
