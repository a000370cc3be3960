//! Response body type.
//!
//! Every response is either a buffered JSON document or empty, so a single
//! [`Full`] body covers both; an empty buffer reports itself as finished.

use bytes::Bytes;
use http_body_util::Full;

/// Response body for calculations API responses.
pub type CalcResponseBody = Full<Bytes>;

/// A body holding `data` in one frame.
#[must_use]
pub fn json_body(data: impl Into<Bytes>) -> CalcResponseBody {
    Full::new(data.into())
}

/// A body with no content, used for `204 No Content`.
#[must_use]
pub fn empty_body() -> CalcResponseBody {
    Full::new(Bytes::new())
}
