//! Request handling shared by the bill and check item endpoints.
//!
//! The axum handlers live in the `bill` and `check` modules. They lock the
//! connection and delegate here with their [LineItemKind].
//!
//! The parent and item are looked up before the request body is parsed, so a
//! wrong address is reported ahead of a malformed body.

use axum::{Json, http::StatusCode};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    Error,
    database_id::{DatabaseId, LineItemId},
    db::record_exists,
    line_item::{
        LineItem, LineItemForm, LineItemKind, create_line_item, delete_line_item,
        get_all_line_items, get_line_item, get_line_items, update_line_item,
    },
    validation::RawPayload,
};

/// List the items of one bill or check.
pub(crate) fn list_items(
    kind: LineItemKind,
    parent_id: DatabaseId,
    connection: &Connection,
) -> Result<Json<Vec<LineItem>>, Error> {
    ensure_parent_exists(kind, parent_id, connection)?;

    get_line_items(kind, parent_id, connection).map(Json)
}

/// List every item of `kind` regardless of parent.
pub(crate) fn list_all_items(
    kind: LineItemKind,
    connection: &Connection,
) -> Result<Json<Vec<LineItem>>, Error> {
    get_all_line_items(kind, connection).map(Json)
}

pub(crate) fn get_item(
    kind: LineItemKind,
    parent_id: DatabaseId,
    item_id: LineItemId,
    connection: &Connection,
) -> Result<Json<LineItem>, Error> {
    get_item_of_parent(kind, parent_id, item_id, connection).map(Json)
}

pub(crate) fn create_item(
    kind: LineItemKind,
    parent_id: DatabaseId,
    payload: &RawPayload,
    connection: &Connection,
) -> Result<(StatusCode, Json<LineItem>), Error> {
    ensure_parent_exists(kind, parent_id, connection)?;

    let form = LineItemForm::from_payload(&payload.parse()?)?;
    let item = create_line_item(kind, parent_id, &form, connection)?;

    tracing::info!(
        "added item {} to {} {parent_id}",
        item.id,
        kind.parent_label()
    );

    Ok((StatusCode::CREATED, Json(item)))
}

pub(crate) fn update_item(
    kind: LineItemKind,
    parent_id: DatabaseId,
    item_id: LineItemId,
    payload: &RawPayload,
    connection: &Connection,
) -> Result<Json<LineItem>, Error> {
    get_item_of_parent(kind, parent_id, item_id, connection)?;

    let form = LineItemForm::from_payload(&payload.parse()?)?;

    update_line_item(kind, item_id, &form, connection).map(Json)
}

pub(crate) fn delete_item(
    kind: LineItemKind,
    parent_id: DatabaseId,
    item_id: LineItemId,
    connection: &Connection,
) -> Result<Json<Value>, Error> {
    get_item_of_parent(kind, parent_id, item_id, connection)?;
    delete_line_item(kind, item_id, connection)?;

    tracing::info!(
        "deleted item {item_id} from {} {parent_id}",
        kind.parent_label()
    );

    Ok(Json(json!({ "message": "Item deleted" })))
}

fn ensure_parent_exists(
    kind: LineItemKind,
    parent_id: DatabaseId,
    connection: &Connection,
) -> Result<(), Error> {
    if record_exists(kind.parent_table(), parent_id, connection)? {
        Ok(())
    } else {
        Err(Error::NotFound(kind.parent_entity()))
    }
}

/// Parent first, then item, then ownership.
fn get_item_of_parent(
    kind: LineItemKind,
    parent_id: DatabaseId,
    item_id: LineItemId,
    connection: &Connection,
) -> Result<LineItem, Error> {
    ensure_parent_exists(kind, parent_id, connection)?;

    let item = get_line_item(kind, item_id, connection)?;

    if item.parent_id != parent_id {
        return Err(Error::ItemNotInParent(kind.parent_label()));
    }

    Ok(item)
}
