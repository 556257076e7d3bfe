//! Reports computed from bills, checks, and deposits.

mod current_repair;
mod month;
mod summary;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, database_id::UserId};

pub use current_repair::{
    CASH_EXPENSE_MARKUP, CurrentRepairQuery, CurrentRepairReport, ReportBill, ReportCheck,
    ReportItem, ReportObject, build_current_repair_report, current_repair_report_endpoint,
};
pub use month::ReportMonth;
pub use summary::{
    DashboardSummary, GroupExpense, MonthlyExpense, OperationKind, Period, RecentOperation,
    SummaryQuery, build_summary, summary_endpoint,
};

/// The state needed by the report endpoints.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading report data.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The user whose deposits fill the cash box.
    pub cashbox_user_id: UserId,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            cashbox_user_id: state.cashbox_user_id,
        }
    }
}
