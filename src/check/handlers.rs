//! HTTP handlers for `/checks`, their items, and `/expense-checks`.

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
    check::{
        Check, CheckFilter, CheckForm, create_check, delete_check, get_check, get_checks,
        update_check,
    },
    database_id::{CheckId, LineItemId},
    db::lock_connection,
    extract::{Path, Query},
    line_item::{
        LineItem, LineItemKind, create_item, delete_item, get_item, list_all_items, list_items,
        update_item,
    },
    validation::{Payload, RawPayload, parse_filter_id},
};

/// The state needed by the check endpoints.
#[derive(Debug, Clone)]
pub struct CheckState {
    /// The database connection for managing checks and their items.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CheckState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for listing checks. Values that are not positive integers are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CheckQuery {
    pub spending_group_id: Option<String>,
    pub user_id: Option<String>,
}

impl From<CheckQuery> for CheckFilter {
    fn from(query: CheckQuery) -> Self {
        Self {
            spending_group_id: parse_filter_id(query.spending_group_id.as_deref()),
            user_id: parse_filter_id(query.user_id.as_deref()),
        }
    }
}

/// List checks, latest first.
pub async fn list_checks_endpoint(
    State(state): State<CheckState>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<Vec<Check>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_checks(query.into(), &connection).map(Json)
}

/// Get a single check.
pub async fn get_check_endpoint(
    State(state): State<CheckState>,
    Path(check_id): Path<CheckId>,
) -> Result<Json<Check>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_check(check_id, &connection).map(Json)
}

/// Create a check from a JSON payload.
pub async fn create_check_endpoint(
    State(state): State<CheckState>,
    payload: Payload,
) -> Result<(StatusCode, Json<Check>), Error> {
    let connection = lock_connection(&state.db_connection)?;
    let form = CheckForm::from_payload(&payload, &connection)?;
    let check = create_check(&form, &connection)?;

    tracing::info!("created check {}", check.id);

    Ok((StatusCode::CREATED, Json(check)))
}

/// Replace an existing check.
pub async fn update_check_endpoint(
    State(state): State<CheckState>,
    Path(check_id): Path<CheckId>,
    payload: Payload,
) -> Result<Json<Check>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    get_check(check_id, &connection)?;

    let form = CheckForm::from_payload(&payload, &connection)?;

    update_check(check_id, &form, &connection).map(Json)
}

/// Delete a check and its items.
pub async fn delete_check_endpoint(
    State(state): State<CheckState>,
    Path(check_id): Path<CheckId>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_check(check_id, &connection)?;

    tracing::info!("deleted check {check_id}");

    Ok(Json(json!({ "message": "Check deleted" })))
}

/// List the items of a check.
pub async fn list_check_items_endpoint(
    State(state): State<CheckState>,
    Path(check_id): Path<CheckId>,
) -> Result<Json<Vec<LineItem>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_items(LineItemKind::Check, check_id, &connection)
}

/// Get one item of a check.
pub async fn get_check_item_endpoint(
    State(state): State<CheckState>,
    Path((check_id, item_id)): Path<(CheckId, LineItemId)>,
) -> Result<Json<LineItem>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_item(LineItemKind::Check, check_id, item_id, &connection)
}

/// Add an item to a check.
pub async fn create_check_item_endpoint(
    State(state): State<CheckState>,
    Path(check_id): Path<CheckId>,
    payload: RawPayload,
) -> Result<(StatusCode, Json<LineItem>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    create_item(LineItemKind::Check, check_id, &payload, &connection)
}

/// Replace one item of a check.
pub async fn update_check_item_endpoint(
    State(state): State<CheckState>,
    Path((check_id, item_id)): Path<(CheckId, LineItemId)>,
    payload: RawPayload,
) -> Result<Json<LineItem>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_item(LineItemKind::Check, check_id, item_id, &payload, &connection)
}

/// Delete one item of a check.
pub async fn delete_check_item_endpoint(
    State(state): State<CheckState>,
    Path((check_id, item_id)): Path<(CheckId, LineItemId)>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_item(LineItemKind::Check, check_id, item_id, &connection)
}

/// List the items of every check, newest first.
pub async fn list_all_check_items_endpoint(
    State(state): State<CheckState>,
) -> Result<Json<Vec<LineItem>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_all_items(LineItemKind::Check, &connection)
}

#[cfg(test)]
mod check_endpoint_tests {
    use axum::{
        Json,
        extract::State,
        http::StatusCode,
        response::IntoResponse,
    };
    use serde_json::json;
    use time::macros::date;

    use crate::{
        Error,
        check::CheckFilter,
        extract::{Path, Query},
        line_item::LineItemKind,
        test_utils::{
            get_test_connection, payload, raw_payload, response_json, seed_check, seed_line_item,
            seed_spending_group, seed_user, shared,
        },
    };

    use super::{
        CheckQuery, CheckState, create_check_endpoint, delete_check_endpoint,
        delete_check_item_endpoint, list_all_check_items_endpoint, list_checks_endpoint,
        update_check_item_endpoint,
    };

    fn get_check_state() -> CheckState {
        CheckState {
            db_connection: shared(get_test_connection()),
        }
    }

    #[test]
    fn query_ignores_non_positive_ids() {
        let filter: CheckFilter = CheckQuery {
            spending_group_id: Some("2".to_owned()),
            user_id: Some("zero".to_owned()),
        }
        .into();

        assert_eq!(
            filter,
            CheckFilter {
                spending_group_id: Some(2),
                user_id: None,
            }
        );
    }

    #[tokio::test]
    async fn create_returns_created_check() {
        let state = get_check_state();
        let (group_id, user_id) = {
            let connection = state.db_connection.lock().unwrap();
            (
                seed_spending_group(None, &connection),
                seed_user("Payer", &connection),
            )
        };

        let response = create_check_endpoint(
            State(state),
            payload(json!({
                "spending_group_id": group_id,
                "user_id": user_id,
                "text": "Хозтовары",
                "date": "2024-08-20",
            })),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert_eq!(body["user_id"], user_id);
        assert_eq!(body["text"], "Хозтовары");
    }

    #[tokio::test]
    async fn list_filters_by_user() {
        let state = get_check_state();
        let user_id = {
            let connection = state.db_connection.lock().unwrap();
            let group_id = seed_spending_group(None, &connection);
            let user_id = seed_user("A", &connection);
            let other_user_id = seed_user("B", &connection);
            seed_check(group_id, user_id, date!(2024 - 08 - 01), &connection);
            seed_check(group_id, other_user_id, date!(2024 - 08 - 01), &connection);
            user_id
        };

        let Json(checks) = list_checks_endpoint(
            State(state),
            Query(CheckQuery {
                spending_group_id: None,
                user_id: Some(user_id.to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].user_id, user_id);
    }

    #[tokio::test]
    async fn item_update_and_delete_check_ownership() {
        let state = get_check_state();
        let (check_id, other_check_id, item_id) = {
            let connection = state.db_connection.lock().unwrap();
            let group_id = seed_spending_group(None, &connection);
            let user_id = seed_user("A", &connection);
            let check_id = seed_check(group_id, user_id, date!(2024 - 08 - 01), &connection);
            let other_check_id = seed_check(group_id, user_id, date!(2024 - 08 - 02), &connection);
            let item_id = seed_line_item(LineItemKind::Check, check_id, 50.0, 2.0, &connection);
            (check_id, other_check_id, item_id)
        };

        let wrong_parent = update_check_item_endpoint(
            State(state.clone()),
            Path((other_check_id, item_id)),
            raw_payload(json!({ "text": "Мыло", "price": 60, "quantity": 2 })),
        )
        .await;
        let Json(updated) = update_check_item_endpoint(
            State(state.clone()),
            Path((check_id, item_id)),
            raw_payload(json!({ "text": "Мыло", "price": 60, "quantity": 2 })),
        )
        .await
        .unwrap();
        let Json(deleted) =
            delete_check_item_endpoint(State(state.clone()), Path((check_id, item_id)))
                .await
                .unwrap();

        assert_eq!(wrong_parent.err(), Some(Error::ItemNotInParent("check")));
        assert_eq!(updated.price, 60.0);
        assert_eq!(deleted, json!({ "message": "Item deleted" }));
        let Json(items) = list_all_check_items_endpoint(State(state)).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_check_is_not_found() {
        let state = get_check_state();

        let response = delete_check_endpoint(State(state), Path(12))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response_json(response).await,
            json!({ "error": "Check not found" })
        );
    }
}
