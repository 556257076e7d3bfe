//! Insert fixture rows through the regular database functions.

use rusqlite::Connection;
use time::{Date, macros::date};

use crate::{
    bill::{BillForm, create_bill},
    check::{CheckForm, create_check},
    database_id::{
        BillId, CheckId, DatabaseId, DepositId, LineItemId, ObjectId, SpendingGroupId, UserId,
    },
    deposit::{DepositForm, create_deposit},
    line_item::{LineItemForm, LineItemKind, create_line_item},
    object::{ObjectForm, create_object},
    spending_group::{SpendingGroupForm, create_spending_group},
    user::{UserForm, create_user},
};

#[track_caller]
pub(crate) fn seed_object(connection: &Connection) -> ObjectId {
    let form = ObjectForm {
        object_address: "ул. Садовая, 12".to_owned(),
        object_area: 1200.0,
        management_fee: 20.0,
        current_repair_rate: 8.5,
        service_start_date: date!(2022 - 01 - 01),
    };

    create_object(&form, connection)
        .expect("Could not create test object")
        .id
}

#[track_caller]
pub(crate) fn seed_user(name: &str, connection: &Connection) -> UserId {
    let form = UserForm {
        user_name: name.to_owned(),
        user_post: "Техник".to_owned(),
        email: None,
    };

    create_user(&form, connection)
        .expect("Could not create test user")
        .id
}

#[track_caller]
pub(crate) fn seed_spending_group(
    object_id: Option<ObjectId>,
    connection: &Connection,
) -> SpendingGroupId {
    let form = SpendingGroupForm {
        object_id,
        text: "Текущий ремонт".to_owned(),
    };

    create_spending_group(&form, connection)
        .expect("Could not create test spending group")
        .id
}

#[track_caller]
pub(crate) fn seed_bill(
    spending_group_id: SpendingGroupId,
    date: Date,
    connection: &Connection,
) -> BillId {
    let form = BillForm {
        spending_group_id,
        text: "Счёт подрядчика".to_owned(),
        date,
    };

    create_bill(&form, connection)
        .expect("Could not create test bill")
        .id
}

#[track_caller]
pub(crate) fn seed_check(
    spending_group_id: SpendingGroupId,
    user_id: UserId,
    date: Date,
    connection: &Connection,
) -> CheckId {
    let form = CheckForm {
        spending_group_id,
        user_id,
        text: "Чек из магазина".to_owned(),
        date,
    };

    create_check(&form, connection)
        .expect("Could not create test check")
        .id
}

#[track_caller]
pub(crate) fn seed_line_item(
    kind: LineItemKind,
    parent_id: DatabaseId,
    price: f64,
    quantity: f64,
    connection: &Connection,
) -> LineItemId {
    let form = LineItemForm {
        text: "Материалы".to_owned(),
        price,
        quantity,
    };

    create_line_item(kind, parent_id, &form, connection)
        .expect("Could not create test line item")
        .id
}

#[track_caller]
pub(crate) fn seed_deposit(
    user_id: UserId,
    amount: f64,
    date: Date,
    connection: &Connection,
) -> DepositId {
    let form = DepositForm {
        user_id,
        amount,
        date,
    };

    create_deposit(&form, connection)
        .expect("Could not create test deposit")
        .id
}
