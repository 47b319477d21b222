//! Savings goals and the pages for setting and listing them.

mod core;
mod create_endpoint;
mod create_page;
mod form;
mod goals_page;

pub use core::{Goal, NewGoal, create_goal, create_goal_table, get_goals_for_user};
pub use create_endpoint::create_goal_endpoint;
pub use create_page::get_create_goal_page;
pub use goals_page::get_goals_page;
