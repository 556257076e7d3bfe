use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    Error,
    database_id::{DatabaseId, LineItemId},
    validation::{Payload, Validator},
};

/// Whether a line item belongs to a bill or to a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemKind {
    /// An item of a bill, stored in `expense_bills`.
    Bill,
    /// An item of a check, stored in `expense_checks`.
    Check,
}

impl LineItemKind {
    pub(crate) fn table(self) -> &'static str {
        match self {
            LineItemKind::Bill => "expense_bills",
            LineItemKind::Check => "expense_checks",
        }
    }

    /// The column, and JSON field, holding the parent's ID.
    pub(crate) fn parent_column(self) -> &'static str {
        match self {
            LineItemKind::Bill => "bills_id",
            LineItemKind::Check => "check_id",
        }
    }

    pub(crate) fn parent_table(self) -> &'static str {
        match self {
            LineItemKind::Bill => "bills",
            LineItemKind::Check => "checks",
        }
    }

    /// The parent's name as used in "not found" messages.
    pub(crate) fn parent_entity(self) -> &'static str {
        match self {
            LineItemKind::Bill => "Bill",
            LineItemKind::Check => "Check",
        }
    }

    /// The parent's name as used in "does not belong" messages.
    pub(crate) fn parent_label(self) -> &'static str {
        match self {
            LineItemKind::Bill => "bill",
            LineItemKind::Check => "check",
        }
    }
}

/// One priced position of a bill or check.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// The ID of the item, unique within its kind.
    pub id: LineItemId,
    /// Whether the item belongs to a bill or a check.
    pub kind: LineItemKind,
    /// The ID of the bill or check the item belongs to.
    pub parent_id: DatabaseId,
    /// What was bought.
    pub text: String,
    /// The price of one unit.
    pub price: f64,
    /// How many units were bought.
    pub quantity: f64,
}

impl LineItem {
    /// The price of all units, without any markup.
    pub fn total(&self) -> f64 {
        self.price * self.quantity
    }
}

impl Serialize for LineItem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("LineItem", 5)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field(self.kind.parent_column(), &self.parent_id)?;
        state.serialize_field("text", &self.text)?;
        state.serialize_field("price", &self.price)?;
        state.serialize_field("quantity", &self.quantity)?;
        state.end()
    }
}

/// The validated fields for creating or updating a [LineItem].
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemForm {
    pub text: String,
    pub price: f64,
    pub quantity: f64,
}

impl LineItemForm {
    /// Validate a request payload.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every invalid field.
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        let mut validator = Validator::new();

        let text = validator.required_text(payload, "text");
        let price = validator.required_number(payload, "price");
        let quantity = validator.required_number(payload, "quantity");

        let errors = validator.into_errors();

        match (text, price, quantity) {
            (Some(text), Some(price), Some(quantity)) if errors.is_empty() => Ok(Self {
                text,
                price,
                quantity,
            }),
            _ => Err(Error::Validation(errors)),
        }
    }
}
