//! Line items of bills and checks.
//!
//! Bills and checks store their items in separate tables with the same
//! shape. [LineItemKind] selects the table, so one implementation serves both.

mod db;
mod domain;
mod handlers;

pub use db::{
    create_line_item, create_line_item_table, delete_line_item, get_all_line_items,
    get_line_item, get_line_items, update_line_item,
};
pub use domain::{LineItem, LineItemForm, LineItemKind};
pub(crate) use handlers::{create_item, delete_item, get_item, list_all_items, list_items, update_item};
