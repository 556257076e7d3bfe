//! Cross-origin resource sharing for browser clients.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::Error;

/// Build the CORS layer for the API.
///
/// `origin` is either `*`, which allows any origin, or a single origin such as
/// `http://localhost:5173`. Requests from any other origin get no
/// `Access-Control-Allow-Origin` header.
///
/// # Errors
/// Returns [Error::InvalidCorsOrigin] if `origin` is not a valid header value.
pub fn build_cors_layer(origin: &str) -> Result<CorsLayer, Error> {
    let allow_origin = match origin.trim() {
        "*" => AllowOrigin::from(Any),
        origin => HeaderValue::from_str(origin)
            .map(|origin| AllowOrigin::list([origin]))
            .map_err(|_| Error::InvalidCorsOrigin(origin.to_owned()))?,
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]))
}
