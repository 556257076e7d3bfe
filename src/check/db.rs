//! Database operations for checks.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    check::{Check, CheckFilter, CheckForm},
    database_id::CheckId,
    db::record_exists,
};

/// Initialize the check table.
pub fn create_check_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS checks (
            id INTEGER PRIMARY KEY,
            spending_group_id INTEGER NOT NULL
                REFERENCES spending_groups(id),
            user_id INTEGER NOT NULL REFERENCES users(id),
            text TEXT NOT NULL,
            date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_checks_spending_group_id ON checks(spending_group_id);
        CREATE INDEX IF NOT EXISTS idx_checks_user_id ON checks(user_id);
        CREATE INDEX IF NOT EXISTS idx_checks_date ON checks(date);",
    )?;

    Ok(())
}

/// Create a check and return it as stored.
pub fn create_check(form: &CheckForm, connection: &Connection) -> Result<Check, Error> {
    connection
        .prepare(
            "INSERT INTO checks (spending_group_id, user_id, text, date) VALUES (?1, ?2, ?3, ?4)
            RETURNING id, spending_group_id, user_id, text, date;",
        )?
        .query_row(
            (form.spending_group_id, form.user_id, &form.text, form.date),
            map_row,
        )
        .map_err(Error::from)
}

/// Retrieve a single check by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no check with `id`.
pub fn get_check(id: CheckId, connection: &Connection) -> Result<Check, Error> {
    connection
        .prepare("SELECT id, spending_group_id, user_id, text, date FROM checks WHERE id = :id;")?
        .query_row(&[(":id", &id)], map_row)
        .optional()?
        .ok_or(Error::NotFound("Check"))
}

/// Retrieve the checks matching `filter`, latest date first.
pub fn get_checks(filter: CheckFilter, connection: &Connection) -> Result<Vec<Check>, Error> {
    connection
        .prepare(
            "SELECT id, spending_group_id, user_id, text, date FROM checks
            WHERE (?1 IS NULL OR spending_group_id = ?1)
                AND (?2 IS NULL OR user_id = ?2)
            ORDER BY date DESC, id DESC;",
        )?
        .query_map((filter.spending_group_id, filter.user_id), map_row)?
        .map(|maybe_check| maybe_check.map_err(Error::from))
        .collect()
}

/// Overwrite a check and return it as stored. Its items are kept.
///
/// # Errors
/// Returns [Error::NotFound] if there is no check with `id`.
pub fn update_check(id: CheckId, form: &CheckForm, connection: &Connection) -> Result<Check, Error> {
    connection
        .prepare(
            "UPDATE checks SET spending_group_id = ?1, user_id = ?2, text = ?3, date = ?4
            WHERE id = ?5
            RETURNING id, spending_group_id, user_id, text, date;",
        )?
        .query_row(
            (form.spending_group_id, form.user_id, &form.text, form.date, id),
            map_row,
        )
        .optional()?
        .ok_or(Error::NotFound("Check"))
}

/// Delete a check together with its items.
///
/// # Errors
/// Returns [Error::NotFound] if there is no check with `id`.
pub fn delete_check(id: CheckId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM checks WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Check"));
    }

    Ok(())
}

/// Check whether a check with `id` exists.
pub fn check_exists(id: CheckId, connection: &Connection) -> Result<bool, Error> {
    record_exists("checks", id, connection)
}

fn map_row(row: &Row) -> Result<Check, rusqlite::Error> {
    Ok(Check {
        id: row.get(0)?,
        spending_group_id: row.get(1)?,
        user_id: row.get(2)?,
        text: row.get(3)?,
        date: row.get(4)?,
    })
}

#[cfg(test)]
mod check_query_tests {
    use time::macros::date;

    use crate::{
        Error,
        check::{CheckFilter, CheckForm, get_check, get_checks, update_check},
        line_item::{LineItemKind, get_line_items},
        test_utils::{
            get_test_connection, seed_check, seed_line_item, seed_spending_group, seed_user,
        },
    };

    use super::{check_exists, delete_check};

    #[test]
    fn filters_combine() {
        let connection = get_test_connection();
        let group_id = seed_spending_group(None, &connection);
        let other_group_id = seed_spending_group(None, &connection);
        let user_id = seed_user("A", &connection);
        let other_user_id = seed_user("B", &connection);
        let wanted = seed_check(group_id, user_id, date!(2024 - 05 - 01), &connection);
        seed_check(group_id, other_user_id, date!(2024 - 05 - 02), &connection);
        seed_check(other_group_id, user_id, date!(2024 - 05 - 03), &connection);

        let both = get_checks(
            CheckFilter {
                spending_group_id: Some(group_id),
                user_id: Some(user_id),
            },
            &connection,
        )
        .unwrap();
        let by_user = get_checks(
            CheckFilter {
                spending_group_id: None,
                user_id: Some(user_id),
            },
            &connection,
        )
        .unwrap();
        let all = get_checks(CheckFilter::default(), &connection).unwrap();

        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, wanted);
        assert_eq!(by_user.len(), 2);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].date, date!(2024 - 05 - 03));
    }

    #[test]
    fn update_check_changes_payer() {
        let connection = get_test_connection();
        let group_id = seed_spending_group(None, &connection);
        let user_id = seed_user("A", &connection);
        let other_user_id = seed_user("B", &connection);
        let check_id = seed_check(group_id, user_id, date!(2024 - 05 - 01), &connection);

        let check = update_check(
            check_id,
            &CheckForm {
                spending_group_id: group_id,
                user_id: other_user_id,
                text: "Reassigned".to_owned(),
                date: date!(2024 - 05 - 04),
            },
            &connection,
        )
        .unwrap();

        assert_eq!(check.user_id, other_user_id);
        assert_eq!(get_check(check_id, &connection), Ok(check));
    }

    #[test]
    fn delete_check_cascades_to_items() {
        let connection = get_test_connection();
        let group_id = seed_spending_group(None, &connection);
        let user_id = seed_user("A", &connection);
        let check_id = seed_check(group_id, user_id, date!(2024 - 05 - 01), &connection);
        seed_line_item(LineItemKind::Check, check_id, 3.0, 3.0, &connection);

        delete_check(check_id, &connection).unwrap();

        assert_eq!(check_exists(check_id, &connection), Ok(false));
        assert_eq!(
            get_line_items(LineItemKind::Check, check_id, &connection),
            Ok(vec![])
        );
    }

    #[test]
    fn get_missing_check_is_not_found() {
        let connection = get_test_connection();

        assert_eq!(get_check(1, &connection), Err(Error::NotFound("Check")));
    }
}
