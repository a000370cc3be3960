//! CORS integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use crate::{client, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_preflight() {
        let resp = client()
            .request(reqwest::Method::OPTIONS, url("/calculations"))
            .header("origin", "https://example.com")
            .header("access-control-request-method", "POST")
            .send()
            .await
            .expect("preflight");
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let headers = resp.headers();
        assert!(headers.contains_key("access-control-allow-origin"));
        assert!(headers.contains_key("access-control-allow-methods"));
        assert!(headers.contains_key("access-control-max-age"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_add_cors_and_request_id_headers() {
        let resp = client()
            .get(url("/calculations"))
            .send()
            .await
            .expect("list");
        let headers = resp.headers();
        assert!(headers.contains_key("access-control-allow-origin"));
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(headers["server"], "CalcStack");
    }
}
