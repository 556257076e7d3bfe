//! HTTP handlers for `/objects`.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    database_id::ObjectId,
    db::lock_connection,
    extract::Path,
    object::{
        Object, ObjectForm, create_object, delete_object, get_all_objects, get_object,
        update_object,
    },
    validation::Payload,
};

/// The state needed by the object endpoints.
#[derive(Debug, Clone)]
pub struct ObjectState {
    /// The database connection for managing objects.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ObjectState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List every object, newest first.
pub async fn list_objects_endpoint(
    State(state): State<ObjectState>,
) -> Result<Json<Vec<Object>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_objects(&connection).map(Json)
}

/// Get a single object.
pub async fn get_object_endpoint(
    State(state): State<ObjectState>,
    Path(object_id): Path<ObjectId>,
) -> Result<Json<Object>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_object(object_id, &connection).map(Json)
}

/// Create an object from a JSON payload.
pub async fn create_object_endpoint(
    State(state): State<ObjectState>,
    payload: Payload,
) -> Result<(StatusCode, Json<Object>), Error> {
    let form = ObjectForm::from_payload(&payload)?;
    let connection = lock_connection(&state.db_connection)?;
    let object = create_object(&form, &connection)?;

    tracing::info!("created object {}", object.id);

    Ok((StatusCode::CREATED, Json(object)))
}

/// Replace the fields of an existing object.
pub async fn update_object_endpoint(
    State(state): State<ObjectState>,
    Path(object_id): Path<ObjectId>,
    payload: Payload,
) -> Result<Json<Object>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    get_object(object_id, &connection)?;

    let form = ObjectForm::from_payload(&payload)?;

    update_object(object_id, &form, &connection).map(Json)
}

/// Delete an object.
pub async fn delete_object_endpoint(
    State(state): State<ObjectState>,
    Path(object_id): Path<ObjectId>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_object(object_id, &connection)?;

    tracing::info!("deleted object {object_id}");

    Ok(Json(json!({ "message": "Object deleted" })))
}
