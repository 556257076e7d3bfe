//! Database operations for objects.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    database_id::ObjectId,
    db::record_exists,
    error::map_delete_error,
    object::{Object, ObjectForm},
};

const OBJECT_COLUMNS: &str =
    "id, object_address, object_area, management_fee, current_repair_rate, service_start_date";

/// Initialize the object table.
pub fn create_object_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS objects (
            id INTEGER PRIMARY KEY,
            object_address TEXT NOT NULL,
            object_area REAL NOT NULL,
            management_fee REAL NOT NULL,
            current_repair_rate REAL NOT NULL,
            service_start_date TEXT NOT NULL
        );",
    )?;

    Ok(())
}

/// Create an object and return it as stored.
pub fn create_object(form: &ObjectForm, connection: &Connection) -> Result<Object, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO objects
                (object_address, object_area, management_fee, current_repair_rate, service_start_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING {OBJECT_COLUMNS};"
        ))?
        .query_row(
            (
                &form.object_address,
                form.object_area,
                form.management_fee,
                form.current_repair_rate,
                form.service_start_date,
            ),
            map_row,
        )
        .map_err(Error::from)
}

/// Retrieve a single object by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no object with `id`.
pub fn get_object(id: ObjectId, connection: &Connection) -> Result<Object, Error> {
    connection
        .prepare(&format!("SELECT {OBJECT_COLUMNS} FROM objects WHERE id = :id;"))?
        .query_row(&[(":id", &id)], map_row)
        .optional()?
        .ok_or(Error::NotFound("Object"))
}

/// Retrieve all objects, newest first.
pub fn get_all_objects(connection: &Connection) -> Result<Vec<Object>, Error> {
    connection
        .prepare(&format!(
            "SELECT {OBJECT_COLUMNS} FROM objects ORDER BY id DESC;"
        ))?
        .query_map([], map_row)?
        .map(|maybe_object| maybe_object.map_err(Error::from))
        .collect()
}

/// Overwrite every field of an object and return it as stored.
///
/// # Errors
/// Returns [Error::NotFound] if there is no object with `id`.
pub fn update_object(
    id: ObjectId,
    form: &ObjectForm,
    connection: &Connection,
) -> Result<Object, Error> {
    connection
        .prepare(&format!(
            "UPDATE objects
            SET object_address = ?1, object_area = ?2, management_fee = ?3,
                current_repair_rate = ?4, service_start_date = ?5
            WHERE id = ?6
            RETURNING {OBJECT_COLUMNS};"
        ))?
        .query_row(
            (
                &form.object_address,
                form.object_area,
                form.management_fee,
                form.current_repair_rate,
                form.service_start_date,
                id,
            ),
            map_row,
        )
        .optional()?
        .ok_or(Error::NotFound("Object"))
}

/// Delete an object. Spending groups that pointed at it are kept, unlinked.
///
/// # Errors
/// Returns [Error::NotFound] if there is no object with `id`.
pub fn delete_object(id: ObjectId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute("DELETE FROM objects WHERE id = ?1", [id])
        .map_err(|error| map_delete_error(error, "Object"))?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Object"));
    }

    Ok(())
}

/// Check whether an object with `id` exists.
pub fn object_exists(id: ObjectId, connection: &Connection) -> Result<bool, Error> {
    record_exists("objects", id, connection)
}

fn map_row(row: &Row) -> Result<Object, rusqlite::Error> {
    Ok(Object {
        id: row.get(0)?,
        object_address: row.get(1)?,
        object_area: row.get(2)?,
        management_fee: row.get(3)?,
        current_repair_rate: row.get(4)?,
        service_start_date: row.get(5)?,
    })
}

#[cfg(test)]
mod object_query_tests {
    use time::macros::date;

    use crate::{
        Error,
        object::{ObjectForm, create_object, get_all_objects, get_object, update_object},
        test_utils::{get_test_connection, seed_object, seed_spending_group},
    };

    use super::{delete_object, object_exists};

    fn test_form(address: &str) -> ObjectForm {
        ObjectForm {
            object_address: address.to_owned(),
            object_area: 812.3,
            management_fee: 21.0,
            current_repair_rate: 6.5,
            service_start_date: date!(2020 - 01 - 15),
        }
    }

    #[test]
    fn create_object_returns_stored_row() {
        let connection = get_test_connection();
        let form = test_form("ул. Мира, 4");

        let object = create_object(&form, &connection).expect("Could not create object");

        assert!(object.id > 0);
        assert_eq!(object.object_address, form.object_address);
        assert_eq!(object.service_start_date, form.service_start_date);
        assert_eq!(get_object(object.id, &connection), Ok(object));
    }

    #[test]
    fn get_missing_object_is_not_found() {
        let connection = get_test_connection();

        assert_eq!(get_object(42, &connection), Err(Error::NotFound("Object")));
    }

    #[test]
    fn get_all_objects_is_newest_first() {
        let connection = get_test_connection();
        let first = create_object(&test_form("A"), &connection).unwrap();
        let second = create_object(&test_form("B"), &connection).unwrap();

        let objects = get_all_objects(&connection).unwrap();

        assert_eq!(objects, vec![second, first]);
    }

    #[test]
    fn update_object_overwrites_fields() {
        let connection = get_test_connection();
        let object = create_object(&test_form("Old"), &connection).unwrap();
        let form = ObjectForm {
            object_area: 100.0,
            ..test_form("New")
        };

        let updated = update_object(object.id, &form, &connection).unwrap();

        assert_eq!(updated.id, object.id);
        assert_eq!(updated.object_address, "New");
        assert_eq!(updated.object_area, 100.0);
    }

    #[test]
    fn update_with_same_values_succeeds() {
        let connection = get_test_connection();
        let form = test_form("Same");
        let object = create_object(&form, &connection).unwrap();

        assert_eq!(update_object(object.id, &form, &connection), Ok(object));
    }

    #[test]
    fn update_missing_object_is_not_found() {
        let connection = get_test_connection();

        assert_eq!(
            update_object(7, &test_form("Nowhere"), &connection),
            Err(Error::NotFound("Object"))
        );
    }

    #[test]
    fn delete_object_unlinks_spending_groups() {
        let connection = get_test_connection();
        let object_id = seed_object(&connection);
        let group = seed_spending_group(Some(object_id), &connection);

        delete_object(object_id, &connection).expect("Could not delete object");

        assert_eq!(object_exists(object_id, &connection), Ok(false));
        let object_id: Option<i64> = connection
            .query_row(
                "SELECT object_id FROM spending_groups WHERE id = ?1",
                [group],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(object_id, None);
    }

    #[test]
    fn delete_missing_object_is_not_found() {
        let connection = get_test_connection();

        assert_eq!(delete_object(3, &connection), Err(Error::NotFound("Object")));
    }
}
