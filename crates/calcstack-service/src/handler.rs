//! Handler implementation bridging HTTP to the provider.

use std::sync::Arc;

use bytes::Bytes;

use calcstack_http::body::CalcResponseBody;
use calcstack_http::dispatch::{CalcHandler, HandlerFuture};
use calcstack_http::response::{empty_response, json_response};
use calcstack_model::error::CalcError;
use calcstack_model::operations::CalcOperation;

use crate::provider::CalcProvider;

/// Handler that bridges the HTTP layer to the calculations provider.
#[derive(Debug)]
pub struct CalcStackHandler {
    provider: Arc<CalcProvider>,
}

impl CalcStackHandler {
    /// Create a new handler wrapping a provider.
    #[must_use]
    pub fn new(provider: Arc<CalcProvider>) -> Self {
        Self { provider }
    }
}

impl CalcHandler for CalcStackHandler {
    fn handle_operation(
        &self,
        op: CalcOperation,
        id: Option<String>,
        body: Bytes,
        request_id: String,
    ) -> HandlerFuture {
        let provider = Arc::clone(&self.provider);
        Box::pin(async move { dispatch(provider.as_ref(), op, id.as_deref(), &body, &request_id) })
    }
}

/// Dispatch an operation to the matching provider method.
fn dispatch(
    provider: &CalcProvider,
    op: CalcOperation,
    id: Option<&str>,
    body: &[u8],
    request_id: &str,
) -> Result<http::Response<CalcResponseBody>, CalcError> {
    let ok = http::StatusCode::OK;
    match op {
        CalcOperation::ListCalculations => {
            serialize(&provider.handle_list_calculations(), ok, request_id)
        }
        CalcOperation::CreateCalculation => {
            let input = deserialize(body)?;
            let output = provider.handle_create_calculation(input)?;
            serialize(&output, http::StatusCode::CREATED, request_id)
        }
        CalcOperation::GetCalculation => {
            let output = provider.handle_get_calculation(require_id(op, id)?)?;
            serialize(&output, ok, request_id)
        }
        CalcOperation::UpdateCalculation => {
            let id = require_id(op, id)?;
            let input = deserialize(body)?;
            let output = provider.handle_update_calculation(id, input)?;
            serialize(&output, ok, request_id)
        }
        CalcOperation::DeleteCalculation => {
            provider.handle_delete_calculation(require_id(op, id)?)?;
            Ok(empty_response(http::StatusCode::NO_CONTENT, request_id))
        }
    }
}

/// The router always supplies an id for member operations.
fn require_id(op: CalcOperation, id: Option<&str>) -> Result<&str, CalcError> {
    id.ok_or_else(|| CalcError::internal_error(format!("{op} requires a calculation id")))
}

/// Deserialize a JSON request body into the input type.
fn deserialize<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, CalcError> {
    serde_json::from_slice(body)
        .map_err(|e| CalcError::invalid_request(format!("invalid request body: {e}")).with_source(e))
}

/// Serialize an output value into a JSON HTTP response.
fn serialize<T: serde::Serialize>(
    output: &T,
    status: http::StatusCode,
    request_id: &str,
) -> Result<http::Response<CalcResponseBody>, CalcError> {
    let json = serde_json::to_vec(output)
        .map_err(|e| CalcError::internal_error(format!("failed to serialize response: {e}")))?;
    Ok(json_response(status, json, request_id))
}
