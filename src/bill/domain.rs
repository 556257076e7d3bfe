use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{BillId, SpendingGroupId},
    spending_group::spending_group_exists,
    validation::{Payload, Validator},
};

/// An invoice filed under a spending group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// The ID of the bill.
    pub id: BillId,
    /// The spending group the bill is filed under.
    pub spending_group_id: SpendingGroupId,
    /// A description of the bill.
    pub text: String,
    /// The date of the bill.
    pub date: Date,
}

/// The validated fields for creating or updating a [Bill].
#[derive(Debug, Clone, PartialEq)]
pub struct BillForm {
    pub spending_group_id: SpendingGroupId,
    pub text: String,
    pub date: Date,
}

impl BillForm {
    /// Validate a request payload and check that the spending group exists.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every problem, or an SQL error.
    pub fn from_payload(payload: &Payload, connection: &Connection) -> Result<Self, Error> {
        let mut validator = Validator::new();

        let spending_group_id = validator.required_id(payload, "spending_group_id");
        let text = validator.required_text(payload, "text");
        let date = validator.required_date(payload, "date");

        if let Some(id) = spending_group_id
            && !spending_group_exists(id, connection)?
        {
            validator.push(format!("Spending group with id {id} does not exist"));
        }

        let errors = validator.into_errors();

        match (spending_group_id, text, date) {
            (Some(spending_group_id), Some(text), Some(date)) if errors.is_empty() => Ok(Self {
                spending_group_id,
                text,
                date,
            }),
            _ => Err(Error::Validation(errors)),
        }
    }
}
