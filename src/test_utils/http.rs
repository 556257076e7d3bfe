use axum::{body::Body, response::Response};
use serde_json::Value;

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

#[track_caller]
pub(crate) fn assert_json_content_type(response: &Response<Body>) {
    assert_eq!(get_header(response, "content-type"), "application/json");
}

/// Read the whole response body as JSON.
pub(crate) async fn response_json(response: Response<Body>) -> Value {
    assert_json_content_type(&response);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not valid JSON")
}
