//! Database operations for bill and check line items.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    database_id::{DatabaseId, LineItemId},
    line_item::{LineItem, LineItemForm, LineItemKind},
};

/// Initialize the item table for `kind`.
///
/// Items are deleted together with their bill or check.
pub fn create_line_item_table(
    kind: LineItemKind,
    connection: &Connection,
) -> Result<(), rusqlite::Error> {
    let table = kind.table();
    let parent_column = kind.parent_column();
    let parent_table = kind.parent_table();

    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY,
            {parent_column} INTEGER NOT NULL REFERENCES {parent_table}(id) ON DELETE CASCADE,
            text TEXT NOT NULL,
            price REAL NOT NULL,
            quantity REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_{parent_column} ON {table}({parent_column});"
    ))?;

    Ok(())
}

/// Add an item to the bill or check with `parent_id` and return it as stored.
pub fn create_line_item(
    kind: LineItemKind,
    parent_id: DatabaseId,
    form: &LineItemForm,
    connection: &Connection,
) -> Result<LineItem, Error> {
    let table = kind.table();
    let parent_column = kind.parent_column();

    connection
        .prepare(&format!(
            "INSERT INTO {table} ({parent_column}, text, price, quantity)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, {parent_column}, text, price, quantity;"
        ))?
        .query_row(
            (parent_id, &form.text, form.price, form.quantity),
            |row| map_row(kind, row),
        )
        .map_err(Error::from)
}

/// Retrieve a single item by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no item of `kind` with `id`.
pub fn get_line_item(
    kind: LineItemKind,
    id: LineItemId,
    connection: &Connection,
) -> Result<LineItem, Error> {
    let table = kind.table();
    let parent_column = kind.parent_column();

    connection
        .prepare(&format!(
            "SELECT id, {parent_column}, text, price, quantity FROM {table} WHERE id = :id;"
        ))?
        .query_row(&[(":id", &id)], |row| map_row(kind, row))
        .optional()?
        .ok_or(Error::NotFound("Item"))
}

/// Retrieve the items of one bill or check in the order they were added.
pub fn get_line_items(
    kind: LineItemKind,
    parent_id: DatabaseId,
    connection: &Connection,
) -> Result<Vec<LineItem>, Error> {
    let table = kind.table();
    let parent_column = kind.parent_column();

    connection
        .prepare(&format!(
            "SELECT id, {parent_column}, text, price, quantity FROM {table}
            WHERE {parent_column} = ?1
            ORDER BY id ASC;"
        ))?
        .query_map([parent_id], |row| map_row(kind, row))?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}

/// Retrieve every item of `kind`, newest first.
pub fn get_all_line_items(
    kind: LineItemKind,
    connection: &Connection,
) -> Result<Vec<LineItem>, Error> {
    let table = kind.table();
    let parent_column = kind.parent_column();

    connection
        .prepare(&format!(
            "SELECT id, {parent_column}, text, price, quantity FROM {table} ORDER BY id DESC;"
        ))?
        .query_map([], |row| map_row(kind, row))?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}

/// Overwrite an item's text, price and quantity and return it as stored.
///
/// # Errors
/// Returns [Error::NotFound] if there is no item of `kind` with `id`.
pub fn update_line_item(
    kind: LineItemKind,
    id: LineItemId,
    form: &LineItemForm,
    connection: &Connection,
) -> Result<LineItem, Error> {
    let table = kind.table();
    let parent_column = kind.parent_column();

    connection
        .prepare(&format!(
            "UPDATE {table} SET text = ?1, price = ?2, quantity = ?3 WHERE id = ?4
            RETURNING id, {parent_column}, text, price, quantity;"
        ))?
        .query_row((&form.text, form.price, form.quantity, id), |row| {
            map_row(kind, row)
        })
        .optional()?
        .ok_or(Error::NotFound("Item"))
}

/// Delete an item.
///
/// # Errors
/// Returns [Error::NotFound] if there is no item of `kind` with `id`.
pub fn delete_line_item(
    kind: LineItemKind,
    id: LineItemId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
        [id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Item"));
    }

    Ok(())
}

fn map_row(kind: LineItemKind, row: &Row) -> Result<LineItem, rusqlite::Error> {
    Ok(LineItem {
        id: row.get(0)?,
        kind,
        parent_id: row.get(1)?,
        text: row.get(2)?,
        price: row.get(3)?,
        quantity: row.get(4)?,
    })
}
