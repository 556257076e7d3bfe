//! Path and query extractors whose rejections are JSON [Error] responses.

use axum::extract::{
    FromRequestParts,
    rejection::{PathRejection, QueryRejection},
};

use crate::Error;

/// [axum::extract::Path] that rejects with [Error::InvalidPath].
///
/// An ID that is not an integer can never match a record, so the request is
/// answered like any other unknown path.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct Path<T>(pub T);

/// [axum::extract::Query] that rejects with [Error::InvalidQuery].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct Query<T>(pub T);

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("rejected path parameters: {rejection}");
        Error::InvalidPath
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("rejected query string: {rejection}");
        Error::InvalidQuery
    }
}
