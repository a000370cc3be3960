//! Integration tests for the CalcStack server.
//!
//! These tests require a running CalcStack server at `localhost:8080`.
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p calcstack-integration -- --ignored
//! ```

use std::sync::Once;

use serde_json::Value;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("CALCSTACK_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// Absolute URL for a server path.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", endpoint_url())
}

/// Create an HTTP client for talking to the local server.
#[must_use]
pub fn client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Create a calculation and return the response body. Panics unless the
/// server answers `201 Created`.
pub async fn create_calculation(client: &reqwest::Client, expression: &str) -> Value {
    let resp = client
        .post(url("/calculations"))
        .json(&serde_json::json!({ "expression": expression }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to create calculation {expression}: {e}"));
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED, "expression: {expression}");
    resp.json().await.expect("calculation json")
}

/// Delete a calculation, ignoring failures.
pub async fn cleanup_calculation(client: &reqwest::Client, id: &str) {
    let _ = client
        .delete(url(&format!("/calculations/{id}")))
        .send()
        .await;
}

mod test_calculation;
mod test_cors;
mod test_error;
mod test_health;
