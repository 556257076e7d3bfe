//! Spending groups are cost categories. A group may belong to one object.

mod db;
mod domain;
mod handlers;

pub use db::{
    create_spending_group, create_spending_group_table, delete_spending_group,
    get_spending_group, get_spending_groups, spending_group_exists, update_spending_group,
};
pub use domain::{SpendingGroup, SpendingGroupForm};
pub use handlers::{
    SpendingGroupFilter, SpendingGroupState, create_spending_group_endpoint,
    delete_spending_group_endpoint, get_spending_group_endpoint, list_spending_groups_endpoint,
    update_spending_group_endpoint,
};
