//! Gateway service in front of the calculations API.
//!
//! Health-check endpoints (`/health`, `/_health`) are answered here; every
//! other request is handed to [`CalcHttpService`].

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use hyper::body::Incoming;
use hyper::service::Service;

use calcstack_http::body::{CalcResponseBody, json_body};
use calcstack_http::dispatch::CalcHandler;
use calcstack_http::service::CalcHttpService;

/// Gateway wrapping the calculations service.
#[derive(Debug)]
pub struct GatewayService<H: CalcHandler> {
    inner: CalcHttpService<H>,
    version: &'static str,
}

impl<H: CalcHandler> GatewayService<H> {
    /// Create a new gateway reporting `version` from its health endpoint.
    pub fn new(inner: CalcHttpService<H>, version: &'static str) -> Self {
        Self { inner, version }
    }
}

impl<H: CalcHandler> Clone for GatewayService<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            version: self.version,
        }
    }
}

impl<H: CalcHandler> Service<http::Request<Incoming>> for GatewayService<H> {
    type Response = http::Response<CalcResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        // Intercept health checks at the gateway level.
        if is_health_check(req.method(), req.uri().path()) {
            let response = self.inner.with_common_headers(health_check_response(self.version));
            return Box::pin(async { Ok(response) });
        }

        self.inner.call(req)
    }
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

/// Produce the health check response.
fn health_check_response(version: &str) -> http::Response<CalcResponseBody> {
    let body = serde_json::json!({ "status": "running", "version": version }).to_string();
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("content-type", "application/json")
        .body(json_body(body))
        .expect("static health response should be valid")
}
