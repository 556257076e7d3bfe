//! Bills are invoices from contractors, paid without cash.

mod db;
mod domain;
mod handlers;

pub use db::{
    bill_exists, create_bill, create_bill_table, delete_bill, get_bill, get_bills, update_bill,
};
pub use domain::{Bill, BillForm};
pub use handlers::{
    BillFilter, BillState, create_bill_endpoint, create_bill_item_endpoint,
    delete_bill_endpoint, delete_bill_item_endpoint, get_bill_endpoint, get_bill_item_endpoint,
    list_all_bill_items_endpoint, list_bill_items_endpoint, list_bills_endpoint,
    update_bill_endpoint, update_bill_item_endpoint,
};
