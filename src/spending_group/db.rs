//! Database operations for spending groups.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    database_id::{ObjectId, SpendingGroupId},
    db::record_exists,
    error::map_delete_error,
    spending_group::{SpendingGroup, SpendingGroupForm},
};

/// Initialize the spending group table.
///
/// Deleting an object keeps its groups but clears their `object_id`.
pub fn create_spending_group_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS spending_groups (
            id INTEGER PRIMARY KEY,
            object_id INTEGER REFERENCES objects(id) ON DELETE SET NULL,
            text TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_spending_groups_object_id ON spending_groups(object_id);",
    )?;

    Ok(())
}

/// Create a spending group and return it as stored.
pub fn create_spending_group(
    form: &SpendingGroupForm,
    connection: &Connection,
) -> Result<SpendingGroup, Error> {
    connection
        .prepare(
            "INSERT INTO spending_groups (object_id, text) VALUES (?1, ?2)
            RETURNING id, object_id, text;",
        )?
        .query_row((form.object_id, &form.text), map_row)
        .map_err(Error::from)
}

/// Retrieve a single spending group by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no spending group with `id`.
pub fn get_spending_group(
    id: SpendingGroupId,
    connection: &Connection,
) -> Result<SpendingGroup, Error> {
    connection
        .prepare("SELECT id, object_id, text FROM spending_groups WHERE id = :id;")?
        .query_row(&[(":id", &id)], map_row)
        .optional()?
        .ok_or(Error::NotFound("Spending group"))
}

/// Retrieve spending groups, newest first, optionally only those of one object.
pub fn get_spending_groups(
    object_id: Option<ObjectId>,
    connection: &Connection,
) -> Result<Vec<SpendingGroup>, Error> {
    connection
        .prepare(
            "SELECT id, object_id, text FROM spending_groups
            WHERE ?1 IS NULL OR object_id = ?1
            ORDER BY id DESC;",
        )?
        .query_map([object_id], map_row)?
        .map(|maybe_group| maybe_group.map_err(Error::from))
        .collect()
}

/// Overwrite a spending group and return it as stored.
///
/// # Errors
/// Returns [Error::NotFound] if there is no spending group with `id`.
pub fn update_spending_group(
    id: SpendingGroupId,
    form: &SpendingGroupForm,
    connection: &Connection,
) -> Result<SpendingGroup, Error> {
    connection
        .prepare(
            "UPDATE spending_groups SET object_id = ?1, text = ?2 WHERE id = ?3
            RETURNING id, object_id, text;",
        )?
        .query_row((form.object_id, &form.text, id), map_row)
        .optional()?
        .ok_or(Error::NotFound("Spending group"))
}

/// Delete a spending group.
///
/// # Errors
/// Returns [Error::NotFound] if there is no spending group with `id`, or
/// [Error::StillReferenced] if bills or checks are filed under it.
pub fn delete_spending_group(id: SpendingGroupId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute("DELETE FROM spending_groups WHERE id = ?1", [id])
        .map_err(|error| map_delete_error(error, "Spending group"))?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Spending group"));
    }

    Ok(())
}

/// Check whether a spending group with `id` exists.
pub fn spending_group_exists(id: SpendingGroupId, connection: &Connection) -> Result<bool, Error> {
    record_exists("spending_groups", id, connection)
}

fn map_row(row: &Row) -> Result<SpendingGroup, rusqlite::Error> {
    Ok(SpendingGroup {
        id: row.get(0)?,
        object_id: row.get(1)?,
        text: row.get(2)?,
    })
}
