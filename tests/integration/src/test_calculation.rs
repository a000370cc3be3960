//! Calculation lifecycle integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::{Value, json};

    use crate::{cleanup_calculation, client, create_calculation, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_and_get_calculation() {
        let client = client();
        let created = create_calculation(&client, "2 + 3 * 4").await;
        let id = created["id"].as_str().expect("id").to_owned();

        assert_eq!(created["expression"], "2 + 3 * 4");
        assert_eq!(created["result"], "14");
        assert_eq!(created["created_at"], created["updated_at"]);

        let resp = client
            .get(url(&format!("/calculations/{id}")))
            .send()
            .await
            .expect("get calculation");
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: Value = resp.json().await.expect("json");
        assert_eq!(fetched, created);

        cleanup_calculation(&client, &id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_render_each_value_kind() {
        let client = client();
        let cases = [
            ("7 / 2", "3.5"),
            ("10 / 2", "5"),
            ("-(2 + 3)", "-5"),
            (r#""foo" + "bar""#, "foobar"),
            ("1 < 2 && !false", "true"),
        ];
        for (expression, expected) in cases {
            let created = create_calculation(&client, expression).await;
            assert_eq!(created["result"], expected, "expression: {expression}");
            cleanup_calculation(&client, created["id"].as_str().expect("id")).await;
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_created_calculations() {
        let client = client();
        let first = create_calculation(&client, "1 + 1").await;
        let second = create_calculation(&client, "2 + 2").await;

        let resp = client
            .get(url("/calculations"))
            .send()
            .await
            .expect("list calculations");
        assert_eq!(resp.status(), StatusCode::OK);
        let list: Vec<Value> = resp.json().await.expect("json array");
        let ids: Vec<&Value> = list.iter().map(|c| &c["id"]).collect();
        let first_pos = ids.iter().position(|id| **id == first["id"]);
        let second_pos = ids.iter().position(|id| **id == second["id"]);
        assert!(first_pos.is_some() && second_pos.is_some());
        assert!(first_pos < second_pos);

        for calc in [first, second] {
            cleanup_calculation(&client, calc["id"].as_str().expect("id")).await;
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_update_calculation() {
        let client = client();
        let created = create_calculation(&client, "1 + 1").await;
        let id = created["id"].as_str().expect("id").to_owned();

        let resp = client
            .patch(url(&format!("/calculations/{id}")))
            .json(&json!({ "expression": "(1 + 1) * 10" }))
            .send()
            .await
            .expect("update calculation");
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: Value = resp.json().await.expect("json");
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["result"], "20");
        assert_eq!(updated["created_at"], created["created_at"]);

        cleanup_calculation(&client, &id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_delete_calculation() {
        let client = client();
        let created = create_calculation(&client, "3").await;
        let id = created["id"].as_str().expect("id").to_owned();

        let resp = client
            .delete(url(&format!("/calculations/{id}")))
            .send()
            .await
            .expect("delete calculation");
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = client
            .get(url(&format!("/calculations/{id}")))
            .send()
            .await
            .expect("get deleted calculation");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
