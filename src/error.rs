//! Defines the app level error type and its conversion to JSON responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body was not a non-empty JSON object.
    #[error("the request body is not a valid JSON object")]
    InvalidJson,

    /// The request body could not be read, e.g. it exceeded the size limit.
    #[error("could not read the request body")]
    UnreadableBody,

    /// A query string parameter required by a report was missing.
    #[error("missing query parameters")]
    MissingParameters,

    /// The payload failed validation.
    ///
    /// Holds every message collected while validating the payload, so the
    /// client can fix all problems in one go.
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),

    /// The requested record does not exist.
    ///
    /// The string names the kind of record, e.g. "Bill", and is shown to the
    /// client.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A line item was addressed through a bill or check it does not belong to.
    ///
    /// The string names the parent kind, e.g. "bill".
    #[error("item does not belong to this {0}")]
    ItemNotInParent(&'static str),

    /// A record could not be deleted because other records still reference it.
    #[error("{0} is still referenced by other records")]
    StillReferenced(&'static str),

    /// A path parameter could not be parsed, e.g. an ID that is not an integer.
    #[error("invalid path parameters")]
    InvalidPath,

    /// The query string could not be deserialized, e.g. a repeated parameter.
    #[error("invalid query string")]
    InvalidQuery,

    /// The path exists but does not accept the request method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The configured CORS origin is not a valid header value.
    #[error("invalid CORS origin \"{0}\"")]
    InvalidCorsOrigin(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, body) = match self {
            Error::InvalidJson => (StatusCode::BAD_REQUEST, json!({ "error": "Invalid JSON" })),
            Error::UnreadableBody => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Could not read request body" }),
            ),
            Error::MissingParameters => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing parameters" }),
            ),
            Error::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": { "errors": errors } }),
            ),
            Error::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{entity} not found") }),
            ),
            Error::ItemNotInParent(parent) => (
                StatusCode::FORBIDDEN,
                json!({ "error": format!("Item does not belong to this {parent}") }),
            ),
            Error::StillReferenced(entity) => (
                StatusCode::CONFLICT,
                json!({ "error": format!("{entity} is still referenced by other records") }),
            ),
            Error::InvalidPath => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Endpoint not found" }),
            ),
            Error::InvalidQuery => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid query string" }),
            ),
            Error::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" }),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}

/// Map a foreign key violation raised while deleting `entity` to
/// [Error::StillReferenced], passing every other error through.
///
/// SQLite reports deferred (`NO ACTION`) violations as
/// `SQLITE_CONSTRAINT_FOREIGNKEY` and immediate (`RESTRICT`) ones as
/// `SQLITE_CONSTRAINT_TRIGGER`. Both carry the same message.
pub(crate) fn map_delete_error(error: rusqlite::Error, entity: &'static str) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ErrorCode::ConstraintViolation,
                extended_code,
            },
            ref message,
        ) if extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
            || message.as_deref() == Some("FOREIGN KEY constraint failed") =>
        {
            Error::StillReferenced(entity)
        }
        error => error.into(),
    }
}
