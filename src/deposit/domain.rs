use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{DepositId, UserId},
    user::user_exists,
    validation::{Payload, Validator},
};

/// An amount of money handed to a user on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    /// The ID of the deposit.
    pub id: DepositId,
    /// The user who received the money.
    pub user_id: UserId,
    /// The amount deposited. Always positive.
    pub amount: f64,
    /// The date of the deposit.
    pub date: Date,
}

/// The validated fields for creating or updating a [Deposit].
#[derive(Debug, Clone, PartialEq)]
pub struct DepositForm {
    pub user_id: UserId,
    pub amount: f64,
    pub date: Date,
}

impl DepositForm {
    /// Validate a request payload and check that the user exists.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every problem, or an SQL error.
    pub fn from_payload(payload: &Payload, connection: &Connection) -> Result<Self, Error> {
        let mut validator = Validator::new();

        let user_id = validator.required_id(payload, "user_id");
        let amount = validator.required_positive_number(payload, "amount");
        let date = validator.required_date(payload, "date");

        if let Some(id) = user_id
            && !user_exists(id, connection)?
        {
            validator.push(format!("User with id {id} does not exist"));
        }

        let errors = validator.into_errors();

        match (user_id, amount, date) {
            (Some(user_id), Some(amount), Some(date)) if errors.is_empty() => Ok(Self {
                user_id,
                amount,
                date,
            }),
            _ => Err(Error::Validation(errors)),
        }
    }
}
