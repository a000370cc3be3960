//! HTTP service layer for the CalcStack calculations API.
//!
//! - **Router**: maps method and path to a [`calcstack_model::CalcOperation`]
//! - **Handler trait**: the boundary between HTTP and business logic
//! - **Service**: hyper `Service` implementation with CORS and request ids
//! - **Response helpers**: JSON success/error response formatting

pub mod body;
pub mod dispatch;
pub mod response;
pub mod router;
pub mod service;

pub use body::{CalcResponseBody, empty_body, json_body};
pub use dispatch::{CalcHandler, HandlerFuture};
pub use router::{RoutedRequest, resolve_route};
pub use service::{CalcHttpConfig, CalcHttpService};
