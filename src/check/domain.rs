use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{CheckId, SpendingGroupId, UserId},
    spending_group::spending_group_exists,
    user::user_exists,
    validation::{Payload, Validator},
};

/// A cash receipt filed under a spending group and paid by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// The ID of the check.
    pub id: CheckId,
    /// The spending group the check is filed under.
    pub spending_group_id: SpendingGroupId,
    /// The employee who paid.
    pub user_id: UserId,
    /// A description of the purchase.
    pub text: String,
    /// The date of the purchase.
    pub date: Date,
}

/// Restricts which checks are listed. `None` fields match every check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckFilter {
    pub spending_group_id: Option<SpendingGroupId>,
    pub user_id: Option<UserId>,
}

/// The validated fields for creating or updating a [Check].
#[derive(Debug, Clone, PartialEq)]
pub struct CheckForm {
    pub spending_group_id: SpendingGroupId,
    pub user_id: UserId,
    pub text: String,
    pub date: Date,
}

impl CheckForm {
    /// Validate a request payload and check that the spending group and user exist.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every problem, or an SQL error.
    pub fn from_payload(payload: &Payload, connection: &Connection) -> Result<Self, Error> {
        let mut validator = Validator::new();

        let spending_group_id = validator.required_id(payload, "spending_group_id");
        let user_id = validator.required_id(payload, "user_id");
        let text = validator.required_text(payload, "text");
        let date = validator.required_date(payload, "date");

        if let Some(id) = spending_group_id
            && !spending_group_exists(id, connection)?
        {
            validator.push(format!("Spending group with id {id} does not exist"));
        }

        if let Some(id) = user_id
            && !user_exists(id, connection)?
        {
            validator.push(format!("User with id {id} does not exist"));
        }

        let errors = validator.into_errors();

        match (spending_group_id, user_id, text, date) {
            (Some(spending_group_id), Some(user_id), Some(text), Some(date))
                if errors.is_empty() =>
            {
                Ok(Self {
                    spending_group_id,
                    user_id,
                    text,
                    date,
                })
            }
            _ => Err(Error::Validation(errors)),
        }
    }
}
