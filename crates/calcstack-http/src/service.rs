//! Calculations HTTP service implementing the hyper `Service` trait.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;

use calcstack_model::error::{CalcError, CalcErrorCode};

use crate::body::CalcResponseBody;
use crate::dispatch::{CalcHandler, dispatch_operation};
use crate::response::{REQUEST_ID_HEADER, empty_response, error_to_response};
use crate::router::{allowed_methods, resolve_route};

/// Methods advertised in CORS responses.
const CORS_ALLOW_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";

/// Request headers accepted in CORS requests.
const CORS_ALLOW_HEADERS: &str = "content-type, x-request-id";

/// Preflight cache lifetime in seconds.
const CORS_MAX_AGE: &str = "86400";

/// Configuration for the calculations HTTP service.
#[derive(Debug, Clone)]
pub struct CalcHttpConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
    /// Value of the `access-control-allow-origin` header.
    pub cors_allow_origin: String,
}

impl Default for CalcHttpConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            cors_allow_origin: "*".to_owned(),
        }
    }
}

/// Hyper `Service` implementation for the calculations API.
///
/// Wraps a [`CalcHandler`] implementation and routes incoming HTTP requests
/// to the matching operation.
#[derive(Debug)]
pub struct CalcHttpService<H: CalcHandler> {
    handler: Arc<H>,
    config: Arc<CalcHttpConfig>,
}

impl<H: CalcHandler> CalcHttpService<H> {
    /// Create a new `CalcHttpService`.
    pub fn new(handler: Arc<H>, config: CalcHttpConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }

    /// Run one request through the full pipeline and log the outcome.
    ///
    /// Generic over the body so that it can be driven without a socket.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<CalcResponseBody>
    where
        B: http_body::Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let started = Instant::now();
        let request_id = uuid::Uuid::new_v4().to_string();
        let method = req.method().clone();
        let path = req.uri().path().to_owned();

        let response = process_request(req, self.handler.as_ref(), &self.config, &request_id).await;
        let response = add_common_headers(response, &request_id, &self.config);

        tracing::info!(
            %method,
            %path,
            status = response.status().as_u16(),
            latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            request_id = %request_id,
            "handled request"
        );
        response
    }

    /// Stamp a response built outside the pipeline with the common headers.
    #[must_use]
    pub fn with_common_headers(
        &self,
        response: http::Response<CalcResponseBody>,
    ) -> http::Response<CalcResponseBody> {
        let request_id = uuid::Uuid::new_v4().to_string();
        add_common_headers(response, &request_id, &self.config)
    }
}

impl<H: CalcHandler> Clone for CalcHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: CalcHandler> hyper::service::Service<http::Request<Incoming>> for CalcHttpService<H> {
    type Response = http::Response<CalcResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}

/// Process a single request through routing, body collection and dispatch.
async fn process_request<B, H>(
    req: http::Request<B>,
    handler: &H,
    config: &CalcHttpConfig,
    request_id: &str,
) -> http::Response<CalcResponseBody>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H: CalcHandler,
{
    let (parts, incoming) = req.into_parts();

    // 1. CORS preflight is answered for any path.
    if parts.method == http::Method::OPTIONS {
        let mut response = empty_response(http::StatusCode::NO_CONTENT, request_id);
        response.headers_mut().insert(
            "access-control-max-age",
            http::HeaderValue::from_static(CORS_MAX_AGE),
        );
        return response;
    }

    // 2. Route: method and path to operation.
    let routed = match resolve_route(&parts.method, parts.uri.path()) {
        Ok(routed) => routed,
        Err(err) => {
            let mut response = error_to_response(&err, request_id);
            if err.code == CalcErrorCode::MethodNotAllowed {
                response.headers_mut().insert(
                    http::header::ALLOW,
                    http::HeaderValue::from_static(allowed_methods(parts.uri.path())),
                );
            }
            return response;
        }
    };

    // 3. Collect body for operations that take one.
    let body = if routed.operation.has_body() {
        match collect_body(incoming, config.max_body_bytes).await {
            Ok(body) => body,
            Err(err) => return error_to_response(&err, request_id),
        }
    } else {
        Bytes::new()
    };

    // 4. Dispatch to handler.
    match dispatch_operation(handler, routed.operation, routed.id, body, request_id).await {
        Ok(response) => response,
        Err(err) => error_to_response(&err, request_id),
    }
}

/// Collect the incoming body into a single `Bytes` buffer, up to `limit` bytes.
async fn collect_body<B>(incoming: B, limit: usize) -> Result<Bytes, CalcError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Limited::new(incoming, limit)
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| {
            if e.is::<LengthLimitError>() {
                CalcError::invalid_request(format!("request body exceeds {limit} bytes"))
            } else {
                CalcError::invalid_request(format!("failed to read request body: {e}"))
            }
        })
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<CalcResponseBody>,
    request_id: &str,
    config: &CalcHttpConfig,
) -> http::Response<CalcResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry(REQUEST_ID_HEADER).or_insert(hv);
    }

    headers.insert("server", http::HeaderValue::from_static("CalcStack"));

    // CORS headers.
    let origin = http::HeaderValue::from_str(&config.cors_allow_origin)
        .unwrap_or_else(|_| http::HeaderValue::from_static("*"));
    headers.insert("access-control-allow-origin", origin);
    headers.insert(
        "access-control-allow-methods",
        http::HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        "access-control-allow-headers",
        http::HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    headers.insert(
        "access-control-expose-headers",
        http::HeaderValue::from_static(REQUEST_ID_HEADER),
    );

    response
}
