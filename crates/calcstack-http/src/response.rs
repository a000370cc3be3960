//! Response serialization and error formatting.

use calcstack_model::error::CalcError;

use crate::body::{CalcResponseBody, empty_body, json_body};

/// Content type for JSON responses.
pub const CONTENT_TYPE: &str = "application/json";

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Serialize an error into a JSON response body.
///
/// ```json
/// {
///   "error": "NotFound",
///   "message": "calculation not found: 5f0c..."
/// }
/// ```
#[must_use]
pub fn error_to_json(error: &CalcError) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "error": error.code.as_str(),
        "message": error.message,
    }))
    .expect("JSON serialization of error cannot fail")
}

/// Convert a `CalcError` into a complete HTTP error response.
#[must_use]
pub fn error_to_response(error: &CalcError, request_id: &str) -> http::Response<CalcResponseBody> {
    http::Response::builder()
        .status(error.status_code)
        .header("content-type", CONTENT_TYPE)
        .header(REQUEST_ID_HEADER, request_id)
        .body(json_body(error_to_json(error)))
        .expect("valid error response")
}

/// Build a success response from JSON bytes.
#[must_use]
pub fn json_response(
    status: http::StatusCode,
    json: Vec<u8>,
    request_id: &str,
) -> http::Response<CalcResponseBody> {
    http::Response::builder()
        .status(status)
        .header("content-type", CONTENT_TYPE)
        .header(REQUEST_ID_HEADER, request_id)
        .body(json_body(json))
        .expect("valid JSON response")
}

/// Build a response with no body.
#[must_use]
pub fn empty_response(status: http::StatusCode, request_id: &str) -> http::Response<CalcResponseBody> {
    http::Response::builder()
        .status(status)
        .header(REQUEST_ID_HEADER, request_id)
        .body(empty_body())
        .expect("valid empty response")
}
