//! Registered users: storage, registration and the profile page.

mod core;
mod form;
mod profile;
mod register;

pub use core::{
    NewUser, User, UserID, create_user, create_user_table, get_user_by_id, get_user_by_username,
    set_staff_status, update_password,
};
pub use profile::{get_profile_page, update_profile_endpoint};
pub use register::{get_register_page, register_user};
