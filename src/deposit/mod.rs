//! Deposits record money handed to a user, most often topping up the cash box.

mod db;
mod domain;
mod handlers;

pub use db::{
    create_deposit, create_deposit_table, delete_deposit, get_deposit, get_deposits,
    update_deposit,
};
pub use domain::{Deposit, DepositForm};
pub use handlers::{
    DepositFilter, DepositState, create_deposit_endpoint, delete_deposit_endpoint,
    get_deposit_endpoint, list_deposits_endpoint, update_deposit_endpoint,
};
