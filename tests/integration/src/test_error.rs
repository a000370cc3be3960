//! Error response integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::{Value, json};

    use crate::{cleanup_calculation, client, create_calculation, url};

    async fn error_body(resp: reqwest::Response) -> Value {
        resp.json().await.expect("error json")
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_invalid_expression() {
        let client = client();
        let resp = client
            .post(url("/calculations"))
            .json(&json!({ "expression": "1 / 0" }))
            .send()
            .await
            .expect("post");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = error_body(resp).await;
        assert_eq!(body["error"], "InvalidExpression");
        assert_eq!(body["message"], "eval error at 2: division by zero");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_malformed_body() {
        let client = client();
        let resp = client
            .post(url("/calculations"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .expect("post");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(resp).await["error"], "InvalidRequest");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_unknown_id() {
        let client = client();
        for method in [reqwest::Method::GET, reqwest::Method::DELETE] {
            let resp = client
                .request(method.clone(), url("/calculations/does-not-exist"))
                .send()
                .await
                .expect("request");
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "method: {method}");
            let body = error_body(resp).await;
            assert_eq!(body["error"], "NotFound");
            assert_eq!(body["message"], "calculation not found: does-not-exist");
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_unknown_route() {
        let resp = client().get(url("/nope")).send().await.expect("get");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_method_not_allowed() {
        let resp = client()
            .put(url("/calculations"))
            .send()
            .await
            .expect("put");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["allow"], "GET, POST, OPTIONS");
        assert_eq!(error_body(resp).await["error"], "MethodNotAllowed");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_keep_record_after_rejected_update() {
        let client = client();
        let created = create_calculation(&client, "4 * 4").await;
        let id = created["id"].as_str().expect("id").to_owned();

        let resp = client
            .patch(url(&format!("/calculations/{id}")))
            .json(&json!({ "expression": "4 *" }))
            .send()
            .await
            .expect("patch");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let fetched: Value = client
            .get(url(&format!("/calculations/{id}")))
            .send()
            .await
            .expect("get")
            .json()
            .await
            .expect("json");
        assert_eq!(fetched, created);

        cleanup_calculation(&client, &id).await;
    }
}
