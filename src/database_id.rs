//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// Database identifier for an object (house).
pub type ObjectId = DatabaseId;
/// Database identifier for a user (employee).
pub type UserId = DatabaseId;
/// Database identifier for a spending group.
pub type SpendingGroupId = DatabaseId;
/// Database identifier for a bill.
pub type BillId = DatabaseId;
/// Database identifier for a check.
pub type CheckId = DatabaseId;
/// Database identifier for a bill or check line item.
pub type LineItemId = DatabaseId;
/// Database identifier for a deposit.
pub type DepositId = DatabaseId;
