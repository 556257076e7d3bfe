//! Database operations for users.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    database_id::UserId,
    db::record_exists,
    error::map_delete_error,
    user::{User, UserForm},
};

/// Initialize the user table.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            user_name TEXT NOT NULL,
            user_post TEXT NOT NULL,
            email TEXT
        );",
    )?;

    Ok(())
}

/// Create a user and return it as stored.
pub fn create_user(form: &UserForm, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "INSERT INTO users (user_name, user_post, email) VALUES (?1, ?2, ?3)
            RETURNING id, user_name, user_post, email;",
        )?
        .query_row((&form.user_name, &form.user_post, &form.email), map_row)
        .map_err(Error::from)
}

/// Retrieve a single user by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no user with `id`.
pub fn get_user(id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, user_name, user_post, email FROM users WHERE id = :id;")?
        .query_row(&[(":id", &id)], map_row)
        .optional()?
        .ok_or(Error::NotFound("User"))
}

/// Retrieve all users, newest first.
pub fn get_all_users(connection: &Connection) -> Result<Vec<User>, Error> {
    connection
        .prepare("SELECT id, user_name, user_post, email FROM users ORDER BY id DESC;")?
        .query_map([], map_row)?
        .map(|maybe_user| maybe_user.map_err(Error::from))
        .collect()
}

/// Overwrite a user's details and return the user as stored.
///
/// # Errors
/// Returns [Error::NotFound] if there is no user with `id`.
pub fn update_user(id: UserId, form: &UserForm, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "UPDATE users SET user_name = ?1, user_post = ?2, email = ?3 WHERE id = ?4
            RETURNING id, user_name, user_post, email;",
        )?
        .query_row((&form.user_name, &form.user_post, &form.email, id), map_row)
        .optional()?
        .ok_or(Error::NotFound("User"))
}

/// Delete a user.
///
/// # Errors
/// Returns [Error::NotFound] if there is no user with `id`, or
/// [Error::StillReferenced] if checks or deposits still point at the user.
pub fn delete_user(id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute("DELETE FROM users WHERE id = ?1", [id])
        .map_err(|error| map_delete_error(error, "User"))?;

    if rows_affected == 0 {
        return Err(Error::NotFound("User"));
    }

    Ok(())
}

/// Check whether a user with `id` exists.
pub fn user_exists(id: UserId, connection: &Connection) -> Result<bool, Error> {
    record_exists("users", id, connection)
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        user_name: row.get(1)?,
        user_post: row.get(2)?,
        email: row.get(3)?,
    })
}
