//! HTTP handlers for `/deposits`.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    database_id::DepositId,
    db::lock_connection,
    deposit::{
        Deposit, DepositForm, create_deposit, delete_deposit, get_deposit, get_deposits,
        update_deposit,
    },
    extract::{Path, Query},
    validation::{Payload, parse_filter_id},
};

/// The state needed by the deposit endpoints.
#[derive(Debug, Clone)]
pub struct DepositState {
    /// The database connection for managing deposits.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DepositState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for listing deposits.
#[derive(Debug, Default, Deserialize)]
pub struct DepositFilter {
    /// Only list deposits to this user. Ignored unless a positive integer.
    pub user_id: Option<String>,
}

/// List deposits, latest first.
pub async fn list_deposits_endpoint(
    State(state): State<DepositState>,
    Query(filter): Query<DepositFilter>,
) -> Result<Json<Vec<Deposit>>, Error> {
    let user_id = parse_filter_id(filter.user_id.as_deref());
    let connection = lock_connection(&state.db_connection)?;

    get_deposits(user_id, &connection).map(Json)
}

/// Get a single deposit.
pub async fn get_deposit_endpoint(
    State(state): State<DepositState>,
    Path(deposit_id): Path<DepositId>,
) -> Result<Json<Deposit>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_deposit(deposit_id, &connection).map(Json)
}

/// Create a deposit from a JSON payload.
pub async fn create_deposit_endpoint(
    State(state): State<DepositState>,
    payload: Payload,
) -> Result<(StatusCode, Json<Deposit>), Error> {
    let connection = lock_connection(&state.db_connection)?;
    let form = DepositForm::from_payload(&payload, &connection)?;
    let deposit = create_deposit(&form, &connection)?;

    tracing::info!(
        "created deposit {} of {} for user {}",
        deposit.id,
        deposit.amount,
        deposit.user_id
    );

    Ok((StatusCode::CREATED, Json(deposit)))
}

/// Replace an existing deposit.
pub async fn update_deposit_endpoint(
    State(state): State<DepositState>,
    Path(deposit_id): Path<DepositId>,
    payload: Payload,
) -> Result<Json<Deposit>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    get_deposit(deposit_id, &connection)?;

    let form = DepositForm::from_payload(&payload, &connection)?;

    update_deposit(deposit_id, &form, &connection).map(Json)
}

/// Delete a deposit.
pub async fn delete_deposit_endpoint(
    State(state): State<DepositState>,
    Path(deposit_id): Path<DepositId>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_deposit(deposit_id, &connection)?;

    tracing::info!("deleted deposit {deposit_id}");

    Ok(Json(json!({ "message": "Deposit deleted" })))
}
