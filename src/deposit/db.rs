//! Database operations for deposits.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    database_id::{DepositId, UserId},
    deposit::{Deposit, DepositForm},
};

/// Initialize the deposit table.
pub fn create_deposit_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS deposits (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id),
            amount REAL NOT NULL,
            date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_deposits_user_id ON deposits(user_id);",
    )?;

    Ok(())
}

/// Create a deposit and return it as stored.
pub fn create_deposit(form: &DepositForm, connection: &Connection) -> Result<Deposit, Error> {
    connection
        .prepare(
            "INSERT INTO deposits (user_id, amount, date) VALUES (?1, ?2, ?3)
            RETURNING id, user_id, amount, date;",
        )?
        .query_row((form.user_id, form.amount, form.date), map_row)
        .map_err(Error::from)
}

/// Retrieve a single deposit by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no deposit with `id`.
pub fn get_deposit(id: DepositId, connection: &Connection) -> Result<Deposit, Error> {
    connection
        .prepare("SELECT id, user_id, amount, date FROM deposits WHERE id = :id;")?
        .query_row(&[(":id", &id)], map_row)
        .optional()?
        .ok_or(Error::NotFound("Deposit"))
}

/// Retrieve deposits, latest date first, optionally only those of one user.
pub fn get_deposits(
    user_id: Option<UserId>,
    connection: &Connection,
) -> Result<Vec<Deposit>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, date FROM deposits
            WHERE ?1 IS NULL OR user_id = ?1
            ORDER BY date DESC, id DESC;",
        )?
        .query_map([user_id], map_row)?
        .map(|maybe_deposit| maybe_deposit.map_err(Error::from))
        .collect()
}

/// Overwrite a deposit and return it as stored.
///
/// # Errors
/// Returns [Error::NotFound] if there is no deposit with `id`.
pub fn update_deposit(
    id: DepositId,
    form: &DepositForm,
    connection: &Connection,
) -> Result<Deposit, Error> {
    connection
        .prepare(
            "UPDATE deposits SET user_id = ?1, amount = ?2, date = ?3 WHERE id = ?4
            RETURNING id, user_id, amount, date;",
        )?
        .query_row((form.user_id, form.amount, form.date, id), map_row)
        .optional()?
        .ok_or(Error::NotFound("Deposit"))
}

/// Delete a deposit.
///
/// # Errors
/// Returns [Error::NotFound] if there is no deposit with `id`.
pub fn delete_deposit(id: DepositId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM deposits WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Deposit"));
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Deposit, rusqlite::Error> {
    Ok(Deposit {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
    })
}
