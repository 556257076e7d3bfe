//! Database operations for bills.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    bill::{Bill, BillForm},
    database_id::{BillId, SpendingGroupId},
    db::record_exists,
};

/// Initialize the bill table.
pub fn create_bill_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS bills (
            id INTEGER PRIMARY KEY,
            spending_group_id INTEGER NOT NULL
                REFERENCES spending_groups(id),
            text TEXT NOT NULL,
            date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_bills_spending_group_id ON bills(spending_group_id);
        CREATE INDEX IF NOT EXISTS idx_bills_date ON bills(date);",
    )?;

    Ok(())
}

/// Create a bill and return it as stored.
pub fn create_bill(form: &BillForm, connection: &Connection) -> Result<Bill, Error> {
    connection
        .prepare(
            "INSERT INTO bills (spending_group_id, text, date) VALUES (?1, ?2, ?3)
            RETURNING id, spending_group_id, text, date;",
        )?
        .query_row((form.spending_group_id, &form.text, form.date), map_row)
        .map_err(Error::from)
}

/// Retrieve a single bill by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no bill with `id`.
pub fn get_bill(id: BillId, connection: &Connection) -> Result<Bill, Error> {
    connection
        .prepare("SELECT id, spending_group_id, text, date FROM bills WHERE id = :id;")?
        .query_row(&[(":id", &id)], map_row)
        .optional()?
        .ok_or(Error::NotFound("Bill"))
}

/// Retrieve bills, latest date first, optionally only those of one spending group.
pub fn get_bills(
    spending_group_id: Option<SpendingGroupId>,
    connection: &Connection,
) -> Result<Vec<Bill>, Error> {
    connection
        .prepare(
            "SELECT id, spending_group_id, text, date FROM bills
            WHERE ?1 IS NULL OR spending_group_id = ?1
            ORDER BY date DESC, id DESC;",
        )?
        .query_map([spending_group_id], map_row)?
        .map(|maybe_bill| maybe_bill.map_err(Error::from))
        .collect()
}

/// Overwrite a bill and return it as stored. Its items are kept.
///
/// # Errors
/// Returns [Error::NotFound] if there is no bill with `id`.
pub fn update_bill(id: BillId, form: &BillForm, connection: &Connection) -> Result<Bill, Error> {
    connection
        .prepare(
            "UPDATE bills SET spending_group_id = ?1, text = ?2, date = ?3 WHERE id = ?4
            RETURNING id, spending_group_id, text, date;",
        )?
        .query_row((form.spending_group_id, &form.text, form.date, id), map_row)
        .optional()?
        .ok_or(Error::NotFound("Bill"))
}

/// Delete a bill together with its items.
///
/// # Errors
/// Returns [Error::NotFound] if there is no bill with `id`.
pub fn delete_bill(id: BillId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM bills WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Bill"));
    }

    Ok(())
}

/// Check whether a bill with `id` exists.
pub fn bill_exists(id: BillId, connection: &Connection) -> Result<bool, Error> {
    record_exists("bills", id, connection)
}

fn map_row(row: &Row) -> Result<Bill, rusqlite::Error> {
    Ok(Bill {
        id: row.get(0)?,
        spending_group_id: row.get(1)?,
        text: row.get(2)?,
        date: row.get(3)?,
    })
}
