//! HTTP handlers for `/users`.

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
    database_id::UserId,
    db::lock_connection,
    extract::Path,
    user::{User, UserForm, create_user, delete_user, get_all_users, get_user, update_user},
    validation::Payload,
};

/// The state needed by the user endpoints.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List every user, newest first.
pub async fn list_users_endpoint(State(state): State<UserState>) -> Result<Json<Vec<User>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_users(&connection).map(Json)
}

/// Get a single user.
pub async fn get_user_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<User>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_user(user_id, &connection).map(Json)
}

/// Create a user from a JSON payload.
pub async fn create_user_endpoint(
    State(state): State<UserState>,
    payload: Payload,
) -> Result<(StatusCode, Json<User>), Error> {
    let form = UserForm::from_payload(&payload)?;
    let connection = lock_connection(&state.db_connection)?;
    let user = create_user(&form, &connection)?;

    tracing::info!("created user {}", user.id);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Replace the details of an existing user.
pub async fn update_user_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<UserId>,
    payload: Payload,
) -> Result<Json<User>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    get_user(user_id, &connection)?;

    let form = UserForm::from_payload(&payload)?;

    update_user(user_id, &form, &connection).map(Json)
}

/// Delete a user that has no checks or deposits.
pub async fn delete_user_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_user(user_id, &connection)?;

    tracing::info!("deleted user {user_id}");

    Ok(Json(json!({ "message": "User deleted" })))
}
