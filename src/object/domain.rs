//! Core object domain types.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::ObjectId,
    validation::{Payload, Validator},
};

/// A managed building (house).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    /// The ID of the object.
    pub id: ObjectId,
    /// The street address of the building.
    pub object_address: String,
    /// The floor area in square metres.
    pub object_area: f64,
    /// The management fee rate charged per square metre.
    pub management_fee: f64,
    /// The current-repair rate charged per square metre.
    pub current_repair_rate: f64,
    /// When the company started managing the building.
    pub service_start_date: Date,
}

/// The validated fields for creating or updating an [Object].
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectForm {
    pub object_address: String,
    pub object_area: f64,
    pub management_fee: f64,
    pub current_repair_rate: f64,
    pub service_start_date: Date,
}

impl ObjectForm {
    /// Validate a request payload.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every invalid field.
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        let mut validator = Validator::new();

        let object_address = validator.required_text(payload, "object_address");
        let object_area = validator.required_number(payload, "object_area");
        let management_fee = validator.required_number(payload, "management_fee");
        let current_repair_rate = validator.required_number(payload, "current_repair_rate");
        let service_start_date = validator.required_date(payload, "service_start_date");

        let errors = validator.into_errors();

        match (
            object_address,
            object_area,
            management_fee,
            current_repair_rate,
            service_start_date,
        ) {
            (
                Some(object_address),
                Some(object_area),
                Some(management_fee),
                Some(current_repair_rate),
                Some(service_start_date),
            ) if errors.is_empty() => Ok(Self {
                object_address,
                object_area,
                management_fee,
                current_repair_rate,
                service_start_date,
            }),
            _ => Err(Error::Validation(errors)),
        }
    }
}

#[cfg(test)]
mod object_form_tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{Error, test_utils::payload};

    use super::ObjectForm;

    #[test]
    fn accepts_complete_payload() {
        let form = ObjectForm::from_payload(&payload(json!({
            "object_address": "ул. Ленина, 1",
            "object_area": "1520.4",
            "management_fee": 18.5,
            "current_repair_rate": 7,
            "service_start_date": "2021-06-01",
        })));

        assert_eq!(
            form,
            Ok(ObjectForm {
                object_address: "ул. Ленина, 1".to_owned(),
                object_area: 1520.4,
                management_fee: 18.5,
                current_repair_rate: 7.0,
                service_start_date: date!(2021 - 06 - 01),
            })
        );
    }

    #[test]
    fn reports_every_problem() {
        let form = ObjectForm::from_payload(&payload(json!({
            "object_area": "big",
            "management_fee": 18.5,
            "current_repair_rate": 7,
            "service_start_date": "01.06.2021",
        })));

        assert_eq!(
            form,
            Err(Error::Validation(vec![
                "object_address is required".to_owned(),
                "object_area must be a number".to_owned(),
                "service_start_date must be in YYYY-MM-DD format".to_owned(),
            ]))
        );
    }
}
