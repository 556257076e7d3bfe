//! HTTP handlers for `/bills`, their items, and `/expense-bills`.

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
    bill::{Bill, BillForm, create_bill, delete_bill, get_bill, get_bills, update_bill},
    database_id::{BillId, LineItemId},
    db::lock_connection,
    extract::{Path, Query},
    line_item::{
        LineItem, LineItemKind, create_item, delete_item, get_item, list_all_items, list_items,
        update_item,
    },
    validation::{Payload, RawPayload, parse_filter_id},
};

/// The state needed by the bill endpoints.
#[derive(Debug, Clone)]
pub struct BillState {
    /// The database connection for managing bills and their items.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BillState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for listing bills.
#[derive(Debug, Default, Deserialize)]
pub struct BillFilter {
    /// Only list bills of this spending group. Ignored unless a positive integer.
    pub spending_group_id: Option<String>,
}

/// List bills, latest first.
pub async fn list_bills_endpoint(
    State(state): State<BillState>,
    Query(filter): Query<BillFilter>,
) -> Result<Json<Vec<Bill>>, Error> {
    let spending_group_id = parse_filter_id(filter.spending_group_id.as_deref());
    let connection = lock_connection(&state.db_connection)?;

    get_bills(spending_group_id, &connection).map(Json)
}

/// Get a single bill.
pub async fn get_bill_endpoint(
    State(state): State<BillState>,
    Path(bill_id): Path<BillId>,
) -> Result<Json<Bill>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_bill(bill_id, &connection).map(Json)
}

/// Create a bill from a JSON payload.
pub async fn create_bill_endpoint(
    State(state): State<BillState>,
    payload: Payload,
) -> Result<(StatusCode, Json<Bill>), Error> {
    let connection = lock_connection(&state.db_connection)?;
    let form = BillForm::from_payload(&payload, &connection)?;
    let bill = create_bill(&form, &connection)?;

    tracing::info!("created bill {}", bill.id);

    Ok((StatusCode::CREATED, Json(bill)))
}

/// Replace an existing bill.
pub async fn update_bill_endpoint(
    State(state): State<BillState>,
    Path(bill_id): Path<BillId>,
    payload: Payload,
) -> Result<Json<Bill>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    get_bill(bill_id, &connection)?;

    let form = BillForm::from_payload(&payload, &connection)?;

    update_bill(bill_id, &form, &connection).map(Json)
}

/// Delete a bill and its items.
pub async fn delete_bill_endpoint(
    State(state): State<BillState>,
    Path(bill_id): Path<BillId>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_bill(bill_id, &connection)?;

    tracing::info!("deleted bill {bill_id}");

    Ok(Json(json!({ "message": "Bill deleted" })))
}

/// List the items of a bill.
pub async fn list_bill_items_endpoint(
    State(state): State<BillState>,
    Path(bill_id): Path<BillId>,
) -> Result<Json<Vec<LineItem>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_items(LineItemKind::Bill, bill_id, &connection)
}

/// Get one item of a bill.
pub async fn get_bill_item_endpoint(
    State(state): State<BillState>,
    Path((bill_id, item_id)): Path<(BillId, LineItemId)>,
) -> Result<Json<LineItem>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_item(LineItemKind::Bill, bill_id, item_id, &connection)
}

/// Add an item to a bill.
pub async fn create_bill_item_endpoint(
    State(state): State<BillState>,
    Path(bill_id): Path<BillId>,
    payload: RawPayload,
) -> Result<(StatusCode, Json<LineItem>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    create_item(LineItemKind::Bill, bill_id, &payload, &connection)
}

/// Replace one item of a bill.
pub async fn update_bill_item_endpoint(
    State(state): State<BillState>,
    Path((bill_id, item_id)): Path<(BillId, LineItemId)>,
    payload: RawPayload,
) -> Result<Json<LineItem>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_item(LineItemKind::Bill, bill_id, item_id, &payload, &connection)
}

/// Delete one item of a bill.
pub async fn delete_bill_item_endpoint(
    State(state): State<BillState>,
    Path((bill_id, item_id)): Path<(BillId, LineItemId)>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_item(LineItemKind::Bill, bill_id, item_id, &connection)
}

/// List the items of every bill, newest first.
pub async fn list_all_bill_items_endpoint(
    State(state): State<BillState>,
) -> Result<Json<Vec<LineItem>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_all_items(LineItemKind::Bill, &connection)
}

#[cfg(test)]
mod bill_endpoint_tests {
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
        extract::{Path, Query},
        line_item::LineItemKind,
        test_utils::{
            get_test_connection, payload, raw_payload, response_json, seed_bill, seed_line_item,
            seed_spending_group, shared,
        },
    };

    use super::{
        BillFilter, BillState, create_bill_endpoint, create_bill_item_endpoint,
        delete_bill_endpoint, get_bill_item_endpoint, list_all_bill_items_endpoint,
        list_bill_items_endpoint, list_bills_endpoint, update_bill_endpoint,
    };

    fn get_bill_state() -> BillState {
        BillState {
            db_connection: shared(get_test_connection()),
        }
    }

    #[tokio::test]
    async fn create_returns_created_bill() {
        let state = get_bill_state();
        let group_id = seed_spending_group(None, &state.db_connection.lock().unwrap());

        let response = create_bill_endpoint(
            State(state),
            payload(json!({
                "spending_group_id": group_id,
                "text": "Счёт за лифт",
                "date": "2024-06-10",
            })),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert_eq!(body["spending_group_id"], group_id);
        assert_eq!(body["date"], "2024-06-10");
    }

    #[tokio::test]
    async fn create_with_unknown_group_is_unprocessable() {
        let state = get_bill_state();

        let result = create_bill_endpoint(
            State(state),
            payload(json!({ "spending_group_id": 3, "text": "x", "date": "2024-06-10" })),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::Validation(vec![
                "Spending group with id 3 does not exist".to_owned()
            ]))
        );
    }

    #[tokio::test]
    async fn list_ignores_invalid_filter() {
        let state = get_bill_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let group_id = seed_spending_group(None, &connection);
            seed_bill(group_id, date!(2024 - 06 - 01), &connection);
            seed_bill(group_id, date!(2024 - 06 - 02), &connection);
        }

        let Json(bills) = list_bills_endpoint(
            State(state),
            Query(BillFilter {
                spending_group_id: Some("-1".to_owned()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].date, date!(2024 - 06 - 02));
    }

    #[tokio::test]
    async fn update_missing_bill_is_not_found() {
        let state = get_bill_state();

        let result = update_bill_endpoint(State(state), Path(4), payload(json!({ "a": 1 }))).await;

        assert_eq!(result.err(), Some(Error::NotFound("Bill")));
    }

    #[tokio::test]
    async fn item_lifecycle() {
        let state = get_bill_state();
        let bill_id = {
            let connection = state.db_connection.lock().unwrap();
            let group_id = seed_spending_group(None, &connection);
            seed_bill(group_id, date!(2024 - 06 - 01), &connection)
        };

        let (status, Json(item)) = create_bill_item_endpoint(
            State(state.clone()),
            Path(bill_id),
            raw_payload(json!({ "text": "Цемент", "price": 520, "quantity": 10 })),
        )
        .await
        .unwrap();
        let Json(fetched) = get_bill_item_endpoint(State(state.clone()), Path((bill_id, item.id)))
            .await
            .unwrap();
        let Json(items) = list_bill_items_endpoint(State(state.clone()), Path(bill_id))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(fetched, item);
        assert_eq!(items, vec![item]);
    }

    #[tokio::test]
    async fn deleting_bill_removes_items_from_all_items_list() {
        let state = get_bill_state();
        let (bill_id, kept_item_id) = {
            let connection = state.db_connection.lock().unwrap();
            let group_id = seed_spending_group(None, &connection);
            let bill_id = seed_bill(group_id, date!(2024 - 06 - 01), &connection);
            let other_bill_id = seed_bill(group_id, date!(2024 - 06 - 02), &connection);
            seed_line_item(LineItemKind::Bill, bill_id, 1.0, 1.0, &connection);
            let kept = seed_line_item(LineItemKind::Bill, other_bill_id, 2.0, 1.0, &connection);
            (bill_id, kept)
        };

        let Json(body) = delete_bill_endpoint(State(state.clone()), Path(bill_id))
            .await
            .unwrap();
        let Json(items) = list_all_bill_items_endpoint(State(state)).await.unwrap();

        assert_eq!(body, json!({ "message": "Bill deleted" }));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, kept_item_id);
    }
}
