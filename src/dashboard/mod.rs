//! Dashboard module
//!
//! Provides an overview page showing totals, charts and goal progress for
//! the logged in user.

mod aggregation;
mod cards;
mod charts;
mod handlers;

pub use handlers::get_dashboard_page;
