//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, database_id::UserId, db::initialize};

/// The user whose deposits fund cash expenses, unless configured otherwise.
pub const DEFAULT_CASHBOX_USER_ID: UserId = 1;

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The user that represents the company cash box in the dashboard summary.
    pub cashbox_user_id: UserId,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, cashbox_user_id: UserId) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            cashbox_user_id,
        })
    }
}
