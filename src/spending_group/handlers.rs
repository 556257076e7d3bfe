//! HTTP handlers for `/spending-groups`.

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
    database_id::SpendingGroupId,
    db::lock_connection,
    extract::{Path, Query},
    spending_group::{
        SpendingGroup, SpendingGroupForm, create_spending_group, delete_spending_group,
        get_spending_group, get_spending_groups, update_spending_group,
    },
    validation::{Payload, parse_filter_id},
};

/// The state needed by the spending group endpoints.
#[derive(Debug, Clone)]
pub struct SpendingGroupState {
    /// The database connection for managing spending groups.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SpendingGroupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for listing spending groups.
///
/// Values that are not positive integers are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SpendingGroupFilter {
    /// Only list the groups of this object.
    pub object_id: Option<String>,
}

/// List spending groups, newest first.
pub async fn list_spending_groups_endpoint(
    State(state): State<SpendingGroupState>,
    Query(filter): Query<SpendingGroupFilter>,
) -> Result<Json<Vec<SpendingGroup>>, Error> {
    let object_id = parse_filter_id(filter.object_id.as_deref());
    let connection = lock_connection(&state.db_connection)?;

    get_spending_groups(object_id, &connection).map(Json)
}

/// Get a single spending group.
pub async fn get_spending_group_endpoint(
    State(state): State<SpendingGroupState>,
    Path(group_id): Path<SpendingGroupId>,
) -> Result<Json<SpendingGroup>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_spending_group(group_id, &connection).map(Json)
}

/// Create a spending group from a JSON payload.
pub async fn create_spending_group_endpoint(
    State(state): State<SpendingGroupState>,
    payload: Payload,
) -> Result<(StatusCode, Json<SpendingGroup>), Error> {
    let connection = lock_connection(&state.db_connection)?;
    let form = SpendingGroupForm::from_payload(&payload, &connection)?;
    let group = create_spending_group(&form, &connection)?;

    tracing::info!("created spending group {}", group.id);

    Ok((StatusCode::CREATED, Json(group)))
}

/// Replace an existing spending group.
pub async fn update_spending_group_endpoint(
    State(state): State<SpendingGroupState>,
    Path(group_id): Path<SpendingGroupId>,
    payload: Payload,
) -> Result<Json<SpendingGroup>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    get_spending_group(group_id, &connection)?;

    let form = SpendingGroupForm::from_payload(&payload, &connection)?;

    update_spending_group(group_id, &form, &connection).map(Json)
}

/// Delete a spending group that no bill or check is filed under.
pub async fn delete_spending_group_endpoint(
    State(state): State<SpendingGroupState>,
    Path(group_id): Path<SpendingGroupId>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_spending_group(group_id, &connection)?;

    tracing::info!("deleted spending group {group_id}");

    Ok(Json(json!({ "message": "Spending group deleted" })))
}
