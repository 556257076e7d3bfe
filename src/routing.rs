//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    bill::{
        create_bill_endpoint, create_bill_item_endpoint, delete_bill_endpoint,
        delete_bill_item_endpoint, get_bill_endpoint, get_bill_item_endpoint,
        list_all_bill_items_endpoint, list_bill_items_endpoint, list_bills_endpoint,
        update_bill_endpoint, update_bill_item_endpoint,
    },
    check::{
        create_check_endpoint, create_check_item_endpoint, delete_check_endpoint,
        delete_check_item_endpoint, get_check_endpoint, get_check_item_endpoint,
        list_all_check_items_endpoint, list_check_items_endpoint, list_checks_endpoint,
        update_check_endpoint, update_check_item_endpoint,
    },
    deposit::{
        create_deposit_endpoint, delete_deposit_endpoint, get_deposit_endpoint,
        list_deposits_endpoint, update_deposit_endpoint,
    },
    endpoints,
    object::{
        create_object_endpoint, delete_object_endpoint, get_object_endpoint,
        list_objects_endpoint, update_object_endpoint,
    },
    report::{current_repair_report_endpoint, summary_endpoint},
    spending_group::{
        create_spending_group_endpoint, delete_spending_group_endpoint,
        get_spending_group_endpoint, list_spending_groups_endpoint,
        update_spending_group_endpoint,
    },
    user::{
        create_user_endpoint, delete_user_endpoint, get_user_endpoint, list_users_endpoint,
        update_user_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index))
        .route(endpoints::TEST, get(get_test))
        .route(
            endpoints::OBJECTS,
            get(list_objects_endpoint).post(create_object_endpoint),
        )
        .route(
            endpoints::OBJECT,
            get(get_object_endpoint)
                .put(update_object_endpoint)
                .delete(delete_object_endpoint),
        )
        .route(
            endpoints::USERS,
            get(list_users_endpoint).post(create_user_endpoint),
        )
        .route(
            endpoints::USER,
            get(get_user_endpoint)
                .put(update_user_endpoint)
                .delete(delete_user_endpoint),
        )
        .route(
            endpoints::SPENDING_GROUPS,
            get(list_spending_groups_endpoint).post(create_spending_group_endpoint),
        )
        .route(
            endpoints::SPENDING_GROUP,
            get(get_spending_group_endpoint)
                .put(update_spending_group_endpoint)
                .delete(delete_spending_group_endpoint),
        )
        .route(
            endpoints::BILLS,
            get(list_bills_endpoint).post(create_bill_endpoint),
        )
        .route(
            endpoints::BILL,
            get(get_bill_endpoint)
                .put(update_bill_endpoint)
                .delete(delete_bill_endpoint),
        )
        .route(
            endpoints::BILL_ITEMS,
            get(list_bill_items_endpoint).post(create_bill_item_endpoint),
        )
        .route(
            endpoints::BILL_ITEM,
            get(get_bill_item_endpoint)
                .put(update_bill_item_endpoint)
                .delete(delete_bill_item_endpoint),
        )
        .route(
            endpoints::CHECKS,
            get(list_checks_endpoint).post(create_check_endpoint),
        )
        .route(
            endpoints::CHECK,
            get(get_check_endpoint)
                .put(update_check_endpoint)
                .delete(delete_check_endpoint),
        )
        .route(
            endpoints::CHECK_ITEMS,
            get(list_check_items_endpoint).post(create_check_item_endpoint),
        )
        .route(
            endpoints::CHECK_ITEM,
            get(get_check_item_endpoint)
                .put(update_check_item_endpoint)
                .delete(delete_check_item_endpoint),
        )
        .route(
            endpoints::DEPOSITS,
            get(list_deposits_endpoint).post(create_deposit_endpoint),
        )
        .route(
            endpoints::DEPOSIT,
            get(get_deposit_endpoint)
                .put(update_deposit_endpoint)
                .delete(delete_deposit_endpoint),
        )
        .route(endpoints::EXPENSE_BILLS, get(list_all_bill_items_endpoint))
        .route(endpoints::EXPENSE_CHECKS, get(list_all_check_items_endpoint))
        .route(
            endpoints::CURRENT_REPAIR_REPORT,
            get(current_repair_report_endpoint),
        )
        .route(endpoints::SUMMARY_REPORT, get(summary_endpoint))
        .fallback(get_404_not_found)
        .method_not_allowed_fallback(get_405_method_not_allowed)
        .with_state(state)
}

/// The root path '/' lists the collection endpoints.
async fn get_index() -> Json<Value> {
    Json(json!({
        "message": "API is running",
        "available_endpoints": endpoints::AVAILABLE_ENDPOINTS,
    }))
}

async fn get_test() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "API is working" }))
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
        .into_response()
}

async fn get_405_method_not_allowed() -> Error {
    Error::MethodNotAllowed
}
