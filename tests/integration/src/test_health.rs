//! Health endpoint integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::Value;

    use crate::{client, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_running() {
        let client = client();
        for path in ["/health", "/_health"] {
            let resp = client.get(url(path)).send().await.expect("health");
            assert_eq!(resp.status(), StatusCode::OK, "path: {path}");
            let body: Value = resp.json().await.expect("json");
            assert_eq!(body["status"], "running");
            assert!(body["version"].is_string());
        }
    }
}
