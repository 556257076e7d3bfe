//! Dashboard figures: cash box balance, expense totals, and recent activity.

use std::collections::{BTreeMap, HashMap};

use axum::{
    Json,
    extract::State,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{DatabaseId, SpendingGroupId, UserId},
    db::lock_connection,
    extract::Query,
    report::ReportState,
    validation::parse_date,
};

const TOP_GROUP_COUNT: usize = 5;
const RECENT_OPERATION_COUNT: usize = 5;

/// Query parameters of the dashboard summary. Both bounds are `YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Inclusive lower bound.
    pub from: Option<String>,
    /// Exclusive upper bound.
    pub to: Option<String>,
}

/// A half-open date range. Missing bounds are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Period {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl Period {
    fn contains(self, date: Date) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date < to)
    }
}

impl TryFrom<SummaryQuery> for Period {
    type Error = Error;

    fn try_from(query: SummaryQuery) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let mut parse_bound = |field: &str, raw: Option<String>| {
            let raw = raw.filter(|raw| !raw.trim().is_empty())?;
            let date = parse_date(&raw);

            if date.is_none() {
                errors.push(format!("{field} must be in YYYY-MM-DD format"));
            }

            date
        };

        let from = parse_bound("from", query.from);
        let to = parse_bound("to", query.to);

        if errors.is_empty() {
            Ok(Self { from, to })
        } else {
            Err(Error::Validation(errors))
        }
    }
}

/// Whether an operation is a check or a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Check,
    Bill,
}

/// Expenses of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyExpense {
    /// The month as `YYYY-MM`.
    pub month: String,
    pub total: f64,
}

/// Expenses filed under one spending group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupExpense {
    /// The group's text followed by its object's address in parentheses.
    pub name: String,
    pub total: f64,
}

/// A check or bill shown in the activity list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentOperation {
    pub kind: OperationKind,
    pub id: DatabaseId,
    pub date: Date,
    pub text: String,
    pub spending_group_id: SpendingGroupId,
}

/// The figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Money left in the cash box, over all time.
    pub cashbox_balance: f64,
    /// Item totals of checks in the period.
    pub check_expenses: f64,
    /// Item totals of bills in the period.
    pub bill_expenses: f64,
    pub total_expenses: f64,
    /// The number of checks and bills in the period.
    pub operations_count: usize,
    /// Item totals per month over all time, oldest month first.
    pub monthly_expenses: Vec<MonthlyExpense>,
    /// The spending groups with the highest item totals over all time.
    pub top_groups: Vec<GroupExpense>,
    /// The newest checks and bills in the period.
    pub recent_operations: Vec<RecentOperation>,
}

/// A check or bill with the sum of its items.
#[derive(Debug, Clone, PartialEq)]
struct Operation {
    kind: OperationKind,
    id: DatabaseId,
    date: Date,
    text: String,
    spending_group_id: SpendingGroupId,
    /// The payer, for checks only.
    user_id: Option<UserId>,
    item_count: i64,
    total: f64,
}

/// Summarize expenses for `?from=YYYY-MM-DD&to=YYYY-MM-DD`.
pub async fn summary_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<DashboardSummary>, Error> {
    let period = Period::try_from(query)?;
    let connection = lock_connection(&state.db_connection)?;

    build_summary(period, state.cashbox_user_id, &connection).map(Json)
}

/// Compute the dashboard figures.
///
/// `cashbox_user_id` is the user whose deposits fill the cash box. Deposits to
/// any other user are treated as cash handed out of the box.
pub fn build_summary(
    period: Period,
    cashbox_user_id: UserId,
    connection: &Connection,
) -> Result<DashboardSummary, Error> {
    let operations = get_operations(connection)?;
    let deposit_totals = get_deposit_totals(connection)?;
    let group_names = get_group_names(connection)?;

    let in_period: Vec<&Operation> = operations
        .iter()
        .filter(|operation| period.contains(operation.date))
        .collect();

    let check_expenses = sum_kind(&in_period, OperationKind::Check);
    let bill_expenses = sum_kind(&in_period, OperationKind::Bill);

    Ok(DashboardSummary {
        cashbox_balance: cashbox_balance(&operations, &deposit_totals, cashbox_user_id),
        check_expenses,
        bill_expenses,
        total_expenses: check_expenses + bill_expenses,
        operations_count: in_period.len(),
        monthly_expenses: monthly_expenses(&operations),
        top_groups: top_groups(&operations, &group_names),
        recent_operations: recent_operations(&in_period),
    })
}

/// Checks first, then bills, each latest first.
fn get_operations(connection: &Connection) -> Result<Vec<Operation>, Error> {
    let mut operations = Vec::new();

    let mut statement = connection.prepare(
        "SELECT c.id, c.date, c.text, c.spending_group_id, c.user_id,
            COUNT(i.id), COALESCE(SUM(i.price * i.quantity), 0.0)
        FROM checks c
        LEFT JOIN expense_checks i ON i.check_id = c.id
        GROUP BY c.id
        ORDER BY c.date DESC, c.id DESC;",
    )?;
    let checks = statement.query_map([], |row| {
        Ok(Operation {
            kind: OperationKind::Check,
            id: row.get(0)?,
            date: row.get(1)?,
            text: row.get(2)?,
            spending_group_id: row.get(3)?,
            user_id: Some(row.get(4)?),
            item_count: row.get(5)?,
            total: row.get(6)?,
        })
    })?;
    for check in checks {
        operations.push(check?);
    }

    let mut statement = connection.prepare(
        "SELECT b.id, b.date, b.text, b.spending_group_id,
            COUNT(i.id), COALESCE(SUM(i.price * i.quantity), 0.0)
        FROM bills b
        LEFT JOIN expense_bills i ON i.bills_id = b.id
        GROUP BY b.id
        ORDER BY b.date DESC, b.id DESC;",
    )?;
    let bills = statement.query_map([], |row| {
        Ok(Operation {
            kind: OperationKind::Bill,
            id: row.get(0)?,
            date: row.get(1)?,
            text: row.get(2)?,
            spending_group_id: row.get(3)?,
            user_id: None,
            item_count: row.get(4)?,
            total: row.get(5)?,
        })
    })?;
    for bill in bills {
        operations.push(bill?);
    }

    Ok(operations)
}

fn get_deposit_totals(connection: &Connection) -> Result<Vec<(UserId, f64)>, Error> {
    connection
        .prepare("SELECT user_id, SUM(amount) FROM deposits GROUP BY user_id;")?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}

fn get_group_names(connection: &Connection) -> Result<HashMap<SpendingGroupId, String>, Error> {
    connection
        .prepare(
            "SELECT g.id, g.text, COALESCE(o.object_address, '')
            FROM spending_groups g
            LEFT JOIN objects o ON o.id = g.object_id;",
        )?
        .query_map([], |row| {
            let id: SpendingGroupId = row.get(0)?;
            let text: String = row.get(1)?;
            let address: String = row.get(2)?;

            Ok((id, format!("{text} ({address})")))
        })?
        .map(|maybe_name| maybe_name.map_err(Error::from))
        .collect()
}

fn sum_kind(operations: &[&Operation], kind: OperationKind) -> f64 {
    operations
        .iter()
        .filter(|operation| operation.kind == kind)
        .map(|operation| operation.total)
        .sum()
}

fn cashbox_balance(
    operations: &[Operation],
    deposit_totals: &[(UserId, f64)],
    cashbox_user_id: UserId,
) -> f64 {
    let (cashbox_deposits, other_deposits) = deposit_totals.iter().fold(
        (0.0_f64, 0.0_f64),
        |(cashbox, others), (user_id, amount)| {
            if *user_id == cashbox_user_id {
                (cashbox + amount, others)
            } else {
                (cashbox, others + amount)
            }
        },
    );

    let cashbox_checks: f64 = operations
        .iter()
        .filter(|operation| operation.user_id == Some(cashbox_user_id))
        .map(|operation| operation.total)
        .sum();

    cashbox_deposits - cashbox_checks - other_deposits
}

/// Months without any items are left out.
fn monthly_expenses(operations: &[Operation]) -> Vec<MonthlyExpense> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for operation in operations.iter().filter(|operation| operation.item_count > 0) {
        let month = format!(
            "{:04}-{:02}",
            operation.date.year(),
            u8::from(operation.date.month())
        );
        *totals.entry(month).or_insert(0.0) += operation.total;
    }

    totals
        .into_iter()
        .map(|(month, total)| MonthlyExpense { month, total })
        .collect()
}

/// Ties are broken by group ID, lowest first.
fn top_groups(
    operations: &[Operation],
    group_names: &HashMap<SpendingGroupId, String>,
) -> Vec<GroupExpense> {
    let mut totals: BTreeMap<SpendingGroupId, f64> = BTreeMap::new();

    for operation in operations {
        *totals.entry(operation.spending_group_id).or_insert(0.0) += operation.total;
    }

    let mut groups: Vec<_> = totals.into_iter().collect();
    groups.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    groups
        .into_iter()
        .take(TOP_GROUP_COUNT)
        .map(|(group_id, total)| GroupExpense {
            name: group_names
                .get(&group_id)
                .cloned()
                .unwrap_or_else(|| format!("Spending group {group_id}")),
            total,
        })
        .collect()
}

/// On equal dates checks come before bills.
fn recent_operations(operations: &[&Operation]) -> Vec<RecentOperation> {
    let mut recent = operations.to_vec();
    recent.sort_by(|a, b| b.date.cmp(&a.date));

    recent
        .into_iter()
        .take(RECENT_OPERATION_COUNT)
        .map(|operation| RecentOperation {
            kind: operation.kind,
            id: operation.id,
            date: operation.date,
            text: operation.text.clone(),
            spending_group_id: operation.spending_group_id,
        })
        .collect()
}

#[cfg(test)]
mod summary_tests {
    use axum::extract::State;
    use time::macros::date;

    use crate::{
        Error,
        extract::Query,
        line_item::LineItemKind,
        report::ReportState,
        test_utils::{
            get_test_connection, seed_bill, seed_check, seed_deposit, seed_line_item,
            seed_object, seed_spending_group, seed_user, shared,
        },
    };

    use super::{OperationKind, Period, SummaryQuery, build_summary, summary_endpoint};

    #[test]
    fn empty_database_has_zero_figures() {
        let connection = get_test_connection();

        let summary = build_summary(Period::default(), 1, &connection).unwrap();

        assert_eq!(summary.cashbox_balance, 0.0);
        assert_eq!(summary.total_expenses, 0.0);
        assert_eq!(summary.operations_count, 0);
        assert!(summary.monthly_expenses.is_empty());
        assert!(summary.top_groups.is_empty());
        assert!(summary.recent_operations.is_empty());
    }

    #[test]
    fn cashbox_balance_subtracts_cashbox_checks_and_other_deposits() {
        let connection = get_test_connection();
        let cashbox = seed_user("Касса", &connection);
        let foreman = seed_user("Прораб", &connection);
        let group_id = seed_spending_group(None, &connection);
        seed_deposit(cashbox, 10_000.0, date!(2024 - 01 - 01), &connection);
        seed_deposit(foreman, 2_000.0, date!(2024 - 01 - 02), &connection);
        let cashbox_check = seed_check(group_id, cashbox, date!(2024 - 01 - 03), &connection);
        seed_line_item(LineItemKind::Check, cashbox_check, 500.0, 3.0, &connection);
        let foreman_check = seed_check(group_id, foreman, date!(2024 - 01 - 04), &connection);
        seed_line_item(LineItemKind::Check, foreman_check, 100.0, 1.0, &connection);

        let summary = build_summary(Period::default(), cashbox, &connection).unwrap();

        assert_eq!(summary.cashbox_balance, 10_000.0 - 1_500.0 - 2_000.0);
    }

    #[test]
    fn period_limits_totals_and_recent_operations_only() {
        let connection = get_test_connection();
        let user_id = seed_user("Касса", &connection);
        let group_id = seed_spending_group(None, &connection);
        let february_bill = seed_bill(group_id, date!(2024 - 02 - 10), &connection);
        seed_line_item(LineItemKind::Bill, february_bill, 200.0, 1.0, &connection);
        let march_check = seed_check(group_id, user_id, date!(2024 - 03 - 05), &connection);
        seed_line_item(LineItemKind::Check, march_check, 40.0, 2.0, &connection);
        let april_bill = seed_bill(group_id, date!(2024 - 04 - 01), &connection);
        seed_line_item(LineItemKind::Bill, april_bill, 1.0, 1.0, &connection);

        let period = Period {
            from: Some(date!(2024 - 03 - 01)),
            to: Some(date!(2024 - 04 - 01)),
        };
        let summary = build_summary(period, user_id, &connection).unwrap();

        assert_eq!(summary.check_expenses, 80.0);
        assert_eq!(summary.bill_expenses, 0.0);
        assert_eq!(summary.total_expenses, 80.0);
        assert_eq!(summary.operations_count, 1);
        assert_eq!(summary.recent_operations.len(), 1);
        assert_eq!(summary.recent_operations[0].kind, OperationKind::Check);
        assert_eq!(summary.recent_operations[0].id, march_check);
        let months: Vec<_> = summary
            .monthly_expenses
            .iter()
            .map(|month| (month.month.as_str(), month.total))
            .collect();
        assert_eq!(
            months,
            vec![("2024-02", 200.0), ("2024-03", 80.0), ("2024-04", 1.0)]
        );
    }

    #[test]
    fn top_groups_are_named_after_group_and_object() {
        let connection = get_test_connection();
        let object_id = seed_object(&connection);
        let roof = seed_spending_group(Some(object_id), &connection);
        let unattached = seed_spending_group(None, &connection);
        let big_bill = seed_bill(roof, date!(2024 - 01 - 01), &connection);
        seed_line_item(LineItemKind::Bill, big_bill, 900.0, 1.0, &connection);
        let small_bill = seed_bill(unattached, date!(2024 - 01 - 01), &connection);
        seed_line_item(LineItemKind::Bill, small_bill, 10.0, 1.0, &connection);

        let summary = build_summary(Period::default(), 1, &connection).unwrap();

        let names: Vec<_> = summary
            .top_groups
            .iter()
            .map(|group| (group.name.as_str(), group.total))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Текущий ремонт (ул. Садовая, 12)", 900.0),
                ("Текущий ремонт ()", 10.0),
            ]
        );
    }

    #[test]
    fn recent_operations_keep_the_five_newest() {
        let connection = get_test_connection();
        let group_id = seed_spending_group(None, &connection);
        let ids: Vec<_> = (1..=7)
            .map(|day| {
                let date = time::Date::from_calendar_date(2024, time::Month::June, day).unwrap();
                seed_bill(group_id, date, &connection)
            })
            .collect();

        let summary = build_summary(Period::default(), 1, &connection).unwrap();

        let recent: Vec<_> = summary.recent_operations.iter().map(|op| op.id).collect();
        assert_eq!(recent, vec![ids[6], ids[5], ids[4], ids[3], ids[2]]);
        assert_eq!(summary.operations_count, 7);
        assert!(summary.monthly_expenses.is_empty());
    }

    #[tokio::test]
    async fn malformed_bounds_are_unprocessable() {
        let state = ReportState {
            db_connection: shared(get_test_connection()),
            cashbox_user_id: 1,
        };

        let result = summary_endpoint(
            State(state),
            Query(SummaryQuery {
                from: Some("yesterday".to_owned()),
                to: Some("2024-13-01".to_owned()),
            }),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::Validation(vec![
                "from must be in YYYY-MM-DD format".to_owned(),
                "to must be in YYYY-MM-DD format".to_owned(),
            ]))
        );
    }

    #[tokio::test]
    async fn blank_bounds_are_unbounded() {
        let state = ReportState {
            db_connection: shared(get_test_connection()),
            cashbox_user_id: 1,
        };

        let result = summary_endpoint(
            State(state),
            Query(SummaryQuery {
                from: Some(String::new()),
                to: None,
            }),
        )
        .await;

        assert!(result.is_ok());
    }
}
