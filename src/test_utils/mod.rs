#![allow(missing_docs)]

pub(crate) mod http;
pub(crate) mod seed;

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use rusqlite::Connection;
use serde_json::Value;

use crate::{
    db::initialize,
    validation::{Payload, RawPayload},
};

pub(crate) use http::response_json;
pub(crate) use seed::{
    seed_bill, seed_check, seed_deposit, seed_line_item, seed_object, seed_spending_group,
    seed_user,
};

/// An initialized in-memory database.
#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize test database");
    connection
}

pub(crate) fn shared(connection: Connection) -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(connection))
}

#[track_caller]
pub(crate) fn payload(value: Value) -> Payload {
    Payload::from_value(value).expect("test payload must be a non-empty object")
}

/// A request body that has not been parsed yet.
pub(crate) fn raw_payload(value: Value) -> RawPayload {
    RawPayload::from(Bytes::from(value.to_string()))
}
