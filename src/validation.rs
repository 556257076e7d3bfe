//! Request payload extraction and field validation.
//!
//! Payloads are decoded as loosely typed JSON objects so that every problem
//! with a request can be reported at once, instead of stopping at the first
//! field that fails to deserialize. Numbers may be sent as JSON numbers or as
//! numeric strings, which is what HTML form controls produce.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use email_address::EmailAddress;
use serde_json::{Map, Value};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, database_id::DatabaseId};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A JSON object sent as a request body.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Parse a request body.
    ///
    /// # Errors
    /// Returns [Error::InvalidJson] if `bytes` is not a JSON object with at least one field.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let value = serde_json::from_slice(bytes).map_err(|_| Error::InvalidJson)?;

        Self::from_value(value)
    }

    /// Wrap an already decoded JSON value.
    ///
    /// # Errors
    /// Returns [Error::InvalidJson] if `value` is not a JSON object with at least one field.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(fields) if !fields.is_empty() => Ok(Self(fields)),
            _ => Err(Error::InvalidJson),
        }
    }

    fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        RawPayload::from_request(request, state).await?.parse()
    }
}

/// A request body that has been read but not parsed yet.
///
/// Handlers that must find the addressed records first take this instead of
/// [Payload] and call [RawPayload::parse] once the records are known to exist.
#[derive(Debug, Clone)]
pub struct RawPayload(Bytes);

impl RawPayload {
    /// Parse the body as a [Payload].
    ///
    /// # Errors
    /// Returns [Error::InvalidJson] if the body is not a JSON object with at least one field.
    pub fn parse(&self) -> Result<Payload, Error> {
        Payload::from_slice(&self.0)
    }
}

impl From<Bytes> for RawPayload {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl<S> FromRequest<S> for RawPayload
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        Bytes::from_request(request, state)
            .await
            .map(Self)
            .map_err(|rejection| {
                tracing::debug!("could not read request body: {rejection}");
                Error::UnreadableBody
            })
    }
}

/// Collects validation messages for a [Payload].
///
/// Each field accessor returns `None` and records a message when the field
/// is invalid. Once every field has been read, [Validator::into_errors]
/// returns all messages together.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    /// Create a validator with no recorded errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a validation message that is not tied to a field accessor,
    /// e.g. a reference to a record that does not exist.
    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Read a non-blank text field, trimmed.
    pub fn required_text(&mut self, payload: &Payload, field: &str) -> Option<String> {
        let value = self.required(payload, field)?;

        match value {
            Value::String(text) => Some(text.trim().to_owned()),
            Value::Number(number) => Some(number.to_string()),
            _ => {
                self.push(format!("{field} must be a string"));
                None
            }
        }
    }

    /// Read a field that must hold a number or a numeric string.
    pub fn required_number(&mut self, payload: &Payload, field: &str) -> Option<f64> {
        let value = self.required(payload, field)?;

        match as_number(value) {
            Some(number) => Some(number),
            None => {
                self.push(format!("{field} must be a number"));
                None
            }
        }
    }

    /// Read a field that must hold a number greater than zero.
    pub fn required_positive_number(&mut self, payload: &Payload, field: &str) -> Option<f64> {
        let value = self.required(payload, field)?;

        match as_number(value) {
            Some(number) if number > 0.0 => Some(number),
            _ => {
                self.push(format!("{field} must be a positive number"));
                None
            }
        }
    }

    /// Read a date in the format `YYYY-MM-DD`.
    pub fn required_date(&mut self, payload: &Payload, field: &str) -> Option<Date> {
        let value = self.required(payload, field)?;

        match value.as_str().and_then(parse_date) {
            Some(date) => Some(date),
            None => {
                self.push(format!("{field} must be in YYYY-MM-DD format"));
                None
            }
        }
    }

    /// Read the ID of a record this payload refers to.
    pub fn required_id(&mut self, payload: &Payload, field: &str) -> Option<DatabaseId> {
        let value = self.required(payload, field)?;

        match as_id(value) {
            Some(0) => {
                self.push(format!("{field} is required"));
                None
            }
            Some(id) => Some(id),
            None => {
                self.push(format!("{field} must be an integer"));
                None
            }
        }
    }

    /// Read an optional record ID.
    ///
    /// Blank values and zero mean "no reference". Anything else that is not
    /// an integer records a message. Both cases yield `None`.
    pub fn optional_id(&mut self, payload: &Payload, field: &str) -> Option<DatabaseId> {
        let value = payload.get(field).filter(|value| !is_blank(Some(value)))?;

        match as_id(value) {
            Some(0) => None,
            Some(id) => Some(id),
            None => {
                self.push(format!("{field} must be an integer"));
                None
            }
        }
    }

    /// Read an optional email address.
    ///
    /// Blank values yield `None`. A non-blank value that is not a valid
    /// address records a message and also yields `None`.
    pub fn optional_email(&mut self, payload: &Payload, field: &str) -> Option<String> {
        let value = payload.get(field).filter(|value| !is_blank(Some(value)))?;

        match value.as_str().map(str::trim) {
            Some(email) if EmailAddress::is_valid(email) => Some(email.to_owned()),
            _ => {
                self.push(format!("{field} must be valid email address"));
                None
            }
        }
    }

    /// Consume the validator, returning every recorded message.
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    fn required<'a>(&mut self, payload: &'a Payload, field: &str) -> Option<&'a Value> {
        let value = payload.get(field);

        if is_blank(value) {
            self.push(format!("{field} is required"));
            None
        } else {
            value
        }
    }
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    let bytes = text.as_bytes();

    let has_date_shape = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, byte)| match i {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });

    if !has_date_shape {
        return None;
    }

    Date::parse(text, DATE_FORMAT).ok()
}

/// Parse a positive integer query parameter, ignoring anything else.
pub fn parse_filter_id(raw: Option<&str>) -> Option<DatabaseId> {
    raw.and_then(|raw| raw.trim().parse::<DatabaseId>().ok())
        .filter(|id| *id > 0)
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

fn as_id(value: &Value) -> Option<DatabaseId> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
