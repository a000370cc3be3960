//! Handler trait and operation dispatch.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use calcstack_model::error::CalcError;
use calcstack_model::operations::CalcOperation;

use crate::body::CalcResponseBody;

/// Future returned by [`CalcHandler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<CalcResponseBody>, CalcError>> + Send>>;

/// Trait that the calculations business logic must implement.
///
/// The handler receives the routed operation, the record id for member
/// operations, and the raw JSON body, and returns a complete HTTP response.
pub trait CalcHandler: Send + Sync + 'static {
    /// Handle an operation and produce an HTTP response.
    fn handle_operation(
        &self,
        op: CalcOperation,
        id: Option<String>,
        body: Bytes,
        request_id: String,
    ) -> HandlerFuture;
}

/// Dispatch an operation to the handler.
pub async fn dispatch_operation<H: CalcHandler>(
    handler: &H,
    op: CalcOperation,
    id: Option<String>,
    body: Bytes,
    request_id: &str,
) -> Result<http::Response<CalcResponseBody>, CalcError> {
    tracing::debug!(operation = %op, id = ?id, "dispatching calculation operation");
    handler
        .handle_operation(op, id, body, request_id.to_owned())
        .await
}
