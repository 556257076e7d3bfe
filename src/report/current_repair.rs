//! The monthly current-repair report for one object.
//!
//! Lists the bills and checks of every spending group attached to the object
//! that fall within the requested month, with their items. Check item totals
//! include [CASH_EXPENSE_MARKUP].

use axum::{
    Json,
    extract::State,
};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{BillId, CheckId, DatabaseId, LineItemId, ObjectId},
    db::lock_connection,
    extract::Query,
    line_item::{LineItem, LineItemKind, get_line_items},
    report::{ReportMonth, ReportState},
    validation::parse_filter_id,
};

/// Multiplier applied to the total of every check item.
pub const CASH_EXPENSE_MARKUP: f64 = 1.10;

/// Query parameters of the current-repair report.
#[derive(Debug, Default, Deserialize)]
pub struct CurrentRepairQuery {
    /// The object to report on.
    pub object_id: Option<String>,
    /// The month to report on, as `YYYY-MM`.
    pub month: Option<String>,
}

/// The object a report was generated for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportObject {
    pub id: ObjectId,
    pub object_address: String,
}

/// One item line of a reported bill or check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportItem {
    pub item_id: LineItemId,
    pub text: String,
    pub price: f64,
    pub quantity: f64,
    /// Price times quantity, with the cash markup for check items.
    pub total: f64,
}

/// A bill in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportBill {
    pub bill_id: BillId,
    pub date: Date,
    pub text: String,
    pub items: Vec<ReportItem>,
    pub total: f64,
}

/// A check in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCheck {
    pub check_id: CheckId,
    pub date: Date,
    pub text: String,
    pub items: Vec<ReportItem>,
    pub total: f64,
}

/// The current-repair costs of an object for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentRepairReport {
    pub object: ReportObject,
    pub bills: Vec<ReportBill>,
    pub checks: Vec<ReportCheck>,
    pub bills_total: f64,
    pub checks_total: f64,
    pub total: f64,
}

/// Build the current-repair report for `?object_id=..&month=YYYY-MM`.
pub async fn current_repair_report_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<CurrentRepairQuery>,
) -> Result<Json<CurrentRepairReport>, Error> {
    let object_id = parse_filter_id(query.object_id.as_deref());
    let month = query
        .month
        .as_deref()
        .map(str::trim)
        .filter(|month| !month.is_empty());

    let (Some(object_id), Some(month)) = (object_id, month) else {
        return Err(Error::MissingParameters);
    };

    let month = ReportMonth::parse(month).ok_or_else(|| {
        Error::Validation(vec!["month must be in YYYY-MM format".to_owned()])
    })?;

    let connection = lock_connection(&state.db_connection)?;

    build_current_repair_report(object_id, month, &connection).map(Json)
}

/// Collect the bills and checks of `object_id` dated within `month`.
///
/// # Errors
/// Returns [Error::NotFound] if the object does not exist.
pub fn build_current_repair_report(
    object_id: ObjectId,
    month: ReportMonth,
    connection: &Connection,
) -> Result<CurrentRepairReport, Error> {
    let object = connection
        .prepare("SELECT id, object_address FROM objects WHERE id = ?1;")?
        .query_row([object_id], |row| {
            Ok(ReportObject {
                id: row.get(0)?,
                object_address: row.get(1)?,
            })
        })
        .optional()?
        .ok_or(Error::NotFound("Object"))?;

    let bills = get_documents_in_month("bills", object_id, month, connection)?
        .into_iter()
        .map(|(bill_id, date, text)| {
            let items = get_report_items(LineItemKind::Bill, bill_id, connection)?;

            Ok(ReportBill {
                bill_id,
                date,
                text,
                total: sum_totals(&items),
                items,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let checks = get_documents_in_month("checks", object_id, month, connection)?
        .into_iter()
        .map(|(check_id, date, text)| {
            let items = get_report_items(LineItemKind::Check, check_id, connection)?;

            Ok(ReportCheck {
                check_id,
                date,
                text,
                total: sum_totals(&items),
                items,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let bills_total: f64 = bills.iter().map(|bill| bill.total).sum();
    let checks_total: f64 = checks.iter().map(|check| check.total).sum();

    Ok(CurrentRepairReport {
        object,
        bills,
        checks,
        bills_total,
        checks_total,
        total: bills_total + checks_total,
    })
}

/// `table` is either `bills` or `checks`, which share the columns used here.
fn get_documents_in_month(
    table: &str,
    object_id: ObjectId,
    month: ReportMonth,
    connection: &Connection,
) -> Result<Vec<(DatabaseId, Date, String)>, Error> {
    connection
        .prepare(&format!(
            "SELECT id, date, text FROM {table}
            WHERE spending_group_id IN (SELECT id FROM spending_groups WHERE object_id = ?1)
                AND date >= ?2 AND date < ?3
            ORDER BY date ASC, id ASC;"
        ))?
        .query_map(
            (object_id, month.first_day(), month.next_month_first_day()),
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}

fn get_report_items(
    kind: LineItemKind,
    parent_id: DatabaseId,
    connection: &Connection,
) -> Result<Vec<ReportItem>, Error> {
    let items = get_line_items(kind, parent_id, connection)?;

    Ok(items.into_iter().map(to_report_item).collect())
}

fn to_report_item(item: LineItem) -> ReportItem {
    let total = match item.kind {
        LineItemKind::Bill => item.total(),
        LineItemKind::Check => item.total() * CASH_EXPENSE_MARKUP,
    };

    ReportItem {
        item_id: item.id,
        text: item.text,
        price: item.price,
        quantity: item.quantity,
        total,
    }
}

fn sum_totals(items: &[ReportItem]) -> f64 {
    items.iter().map(|item| item.total).sum()
}
