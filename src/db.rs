//! Database initialization and helpers shared by the resource modules.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};

use crate::{
    Error,
    bill::create_bill_table,
    check::create_check_table,
    database_id::DatabaseId,
    deposit::create_deposit_table,
    line_item::{LineItemKind, create_line_item_table},
    object::create_object_table,
    spending_group::create_spending_group_table,
    user::create_user_table,
};

/// Create all application tables if they do not exist yet.
///
/// Foreign key enforcement is switched on for `connection`, since the bill and
/// check line items rely on `ON DELETE CASCADE`.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_object_table(&transaction)?;
    create_user_table(&transaction)?;
    create_spending_group_table(&transaction)?;
    create_bill_table(&transaction)?;
    create_check_table(&transaction)?;
    create_line_item_table(LineItemKind::Bill, &transaction)?;
    create_line_item_table(LineItemKind::Check, &transaction)?;
    create_deposit_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Check whether `table` has a row with the primary key `id`.
///
/// `table` must be one of the application's table names, never user input.
pub(crate) fn record_exists(
    table: &str,
    id: DatabaseId,
    connection: &Connection,
) -> Result<bool, Error> {
    let found = connection
        .query_row(
            &format!("SELECT 1 FROM {table} WHERE id = ?1"),
            [id],
            |_| Ok(()),
        )
        .optional()?;

    Ok(found.is_some())
}
