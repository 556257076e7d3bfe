use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::{ObjectId, SpendingGroupId},
    object::object_exists,
    validation::{Payload, Validator},
};

/// A cost category that bills and checks are filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingGroup {
    /// The ID of the spending group.
    pub id: SpendingGroupId,
    /// The building the group belongs to, if any.
    pub object_id: Option<ObjectId>,
    /// The name of the group.
    pub text: String,
}

/// The validated fields for creating or updating a [SpendingGroup].
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingGroupForm {
    pub object_id: Option<ObjectId>,
    pub text: String,
}

impl SpendingGroupForm {
    /// Validate a request payload and check that the referenced object exists.
    ///
    /// A blank or zero `object_id` leaves the group without an object.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every problem, or an SQL error.
    pub fn from_payload(payload: &Payload, connection: &Connection) -> Result<Self, Error> {
        let mut validator = Validator::new();

        let text = validator.required_text(payload, "text");
        let object_id = validator.optional_id(payload, "object_id");

        if let Some(object_id) = object_id
            && !object_exists(object_id, connection)?
        {
            validator.push(format!("Object with id {object_id} does not exist"));
        }

        let errors = validator.into_errors();

        match text {
            Some(text) if errors.is_empty() => Ok(Self { object_id, text }),
            _ => Err(Error::Validation(errors)),
        }
    }
}
