//! Integration tests for the REST client using wiremock mock server

use cloud_client::{Client, ClientError};

use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

#[tokio::test]
async fn test_get_success_returns_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/users/self"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "uuid": "u1",
                "custom": {"level": 3},
                "details": {"email": "a@example.com"}
            }
        })))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri());
    let result = client.get("/auth/users/self").await.unwrap();

    assert_eq!(result["data"]["uuid"], "u1");
    assert_eq!(result["data"]["custom"]["level"], 3);
}

#[tokio::test]
async fn test_get_not_found_maps_error_type_and_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/users/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "type": "NotFound",
                "message": "User not found"
            }
        })))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri());
    let err = client.get("/auth/users/missing").await.unwrap_err();

    match &err {
        ClientError::Api {
            status,
            code,
            message,
            ..
        } => {
            assert_eq!(*status, 404);
            assert_eq!(code, "NotFound");
            assert_eq!(message, "User not found");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_without_json_body_still_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/auth/users/u1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri());
    let err = client.patch("/auth/users/u1", &json!({})).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.is_transient());
    assert!(err.to_string().contains("upstream exploded"));
}

#[tokio::test]
async fn test_patch_sends_json_body() {
    let mock_server = MockServer::start().await;
    let payload = json!({"email": "a@example.com", "custom": {"k": "v"}});

    Mock::given(method("PATCH"))
        .and(path("/auth/users/u1"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri());
    let result = client.patch("/auth/users/u1", &payload).await.unwrap();

    assert_eq!(result, json!({"data": {}}));
}

#[tokio::test]
async fn test_bearer_token_sent_when_set() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/users/u1/password-reset"))
        .and(header("Authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"meta": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri());
    client.set_token(Some("token-123".to_string()));
    let result = client.post("/auth/users/u1/password-reset", None).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_with_empty_body_returns_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/auth/users/u1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri());
    let result = client.delete("/auth/users/u1").await.unwrap();

    assert!(result.is_null());
}

#[tokio::test]
async fn test_invalid_json_on_success_is_json_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/users/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri());
    let err = client.get("/auth/users/u1").await.unwrap_err();

    assert!(matches!(err, ClientError::Json { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let client = Client::new("http://127.0.0.1:9");
    let err = client.get("/auth/users/self").await.unwrap_err();

    assert!(matches!(err, ClientError::Http { .. }));
}
