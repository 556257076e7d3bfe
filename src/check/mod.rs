//! Checks are cash receipts. An employee pays and is reimbursed from the cash box.

mod db;
mod domain;
mod handlers;

pub use db::{
    check_exists, create_check, create_check_table, delete_check, get_check, get_checks,
    update_check,
};
pub use domain::{Check, CheckFilter, CheckForm};
pub use handlers::{
    CheckQuery, CheckState, create_check_endpoint, create_check_item_endpoint,
    delete_check_endpoint, delete_check_item_endpoint, get_check_endpoint,
    get_check_item_endpoint, list_all_check_items_endpoint, list_check_items_endpoint,
    list_checks_endpoint, update_check_endpoint, update_check_item_endpoint,
};
