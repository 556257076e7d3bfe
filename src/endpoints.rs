//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/objects/{object_id}', use [format_endpoint] in tests.

/// The root route which lists the available endpoints.
pub const ROOT: &str = "/";
/// A health check route.
pub const TEST: &str = "/test";
/// The route for listing and creating objects.
pub const OBJECTS: &str = "/objects";
/// The route for a single object.
pub const OBJECT: &str = "/objects/{object_id}";
/// The route for listing and creating users.
pub const USERS: &str = "/users";
/// The route for a single user.
pub const USER: &str = "/users/{user_id}";
/// The route for listing and creating spending groups.
pub const SPENDING_GROUPS: &str = "/spending-groups";
/// The route for a single spending group.
pub const SPENDING_GROUP: &str = "/spending-groups/{spending_group_id}";
/// The route for listing and creating bills.
pub const BILLS: &str = "/bills";
/// The route for a single bill.
pub const BILL: &str = "/bills/{bill_id}";
/// The route for listing and creating the items of a bill.
pub const BILL_ITEMS: &str = "/bills/{bill_id}/items";
/// The route for a single item of a bill.
pub const BILL_ITEM: &str = "/bills/{bill_id}/items/{item_id}";
/// The route for listing and creating checks.
pub const CHECKS: &str = "/checks";
/// The route for a single check.
pub const CHECK: &str = "/checks/{check_id}";
/// The route for listing and creating the items of a check.
pub const CHECK_ITEMS: &str = "/checks/{check_id}/items";
/// The route for a single item of a check.
pub const CHECK_ITEM: &str = "/checks/{check_id}/items/{item_id}";
/// The route for listing and creating deposits.
pub const DEPOSITS: &str = "/deposits";
/// The route for a single deposit.
pub const DEPOSIT: &str = "/deposits/{deposit_id}";
/// The route for listing the items of every bill.
pub const EXPENSE_BILLS: &str = "/expense-bills";
/// The route for listing the items of every check.
pub const EXPENSE_CHECKS: &str = "/expense-checks";
/// The monthly current-repair report for one object.
pub const CURRENT_REPAIR_REPORT: &str = "/reports/current-repair";
/// The dashboard summary.
pub const SUMMARY_REPORT: &str = "/reports/summary";

/// The collection routes advertised by the root route.
pub const AVAILABLE_ENDPOINTS: [&str; 10] = [
    OBJECTS,
    USERS,
    SPENDING_GROUPS,
    BILLS,
    CHECKS,
    DEPOSITS,
    EXPENSE_BILLS,
    EXPENSE_CHECKS,
    CURRENT_REPAIR_REPORT,
    SUMMARY_REPORT,
];

/// Replace each parameter in `endpoint_path` with the next value of `ids`, in order.
///
/// Parameters without a matching id are left as is.
///
/// # Examples
/// ```ignore
/// assert_eq!(format_endpoint("/bills/{bill_id}/items/{item_id}", &[1, 2]), "/bills/1/items/2");
/// ```
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, ids: &[i64]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut rest = endpoint_path;
    let mut ids = ids.iter();

    while let Some(start) = rest.find('{') {
        let Some(end) = rest[start..].find('}').map(|end| start + end + 1) else {
            break;
        };
        let Some(id) = ids.next() else {
            break;
        };

        formatted.push_str(&rest[..start]);
        formatted.push_str(&id.to_string());
        rest = &rest[end..];
    }

    formatted.push_str(rest);
    formatted
}
