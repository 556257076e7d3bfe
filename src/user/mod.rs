//! Users are the company's employees. Checks and deposits are recorded against them.

mod db;
mod domain;
mod handlers;

pub use db::{
    create_user, create_user_table, delete_user, get_all_users, get_user, update_user,
    user_exists,
};
pub use domain::{User, UserForm};
pub use handlers::{
    UserState, create_user_endpoint, delete_user_endpoint, get_user_endpoint,
    list_users_endpoint, update_user_endpoint,
};
