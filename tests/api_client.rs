//! API client tests against a local mock backend.

use serde::Deserialize;
use serde_json::json;
use spa_shell::api::{ApiClient, ApiError};
use spa_shell::config::ApiConfig;
use spa_shell::storage::{JsonFileStore, KeyValueStore, MemoryStore};

mod common;

#[derive(Debug, Deserialize)]
struct Echo {
    method: String,
    path: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: String,
}

fn config_for(addr: std::net::SocketAddr) -> ApiConfig {
    ApiConfig {
        base_url: format!("http://{}", addr),
        ..ApiConfig::default()
    }
}

#[tokio::test]
async fn test_bearer_token_sent_on_every_request() {
    let addr = common::start_echo_backend().await;
    let store = MemoryStore::with_entries([("token", "secret-123")]);
    let client = ApiClient::from_store(&config_for(addr), &store).unwrap();

    let echo: Echo = client.get_json("/api/profile").await.unwrap();
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/api/profile");
    assert_eq!(echo.authorization.as_deref(), Some("Bearer secret-123"));
    assert_eq!(echo.content_type.as_deref(), Some("application/json"));

    let echo: Echo = client
        .post_json("/api/models", &json!({ "name": "car" }))
        .await
        .unwrap();
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.authorization.as_deref(), Some("Bearer secret-123"));
    assert_eq!(echo.body, r#"{"name":"car"}"#);
}

#[tokio::test]
async fn test_no_token_sends_no_authorization() {
    let addr = common::start_echo_backend().await;
    let client = ApiClient::from_store(&config_for(addr), &MemoryStore::new()).unwrap();

    let echo: Echo = client.get_json("/api/public").await.unwrap();
    assert!(echo.authorization.is_none());
    assert_eq!(echo.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_token_read_once_at_construction() {
    let addr = common::start_echo_backend().await;
    let store = MemoryStore::with_entries([("token", "first")]);
    let client = ApiClient::from_store(&config_for(addr), &store).unwrap();

    // Later changes to storage don't reach an existing client
    store.set("token", "second").unwrap();
    let echo: Echo = client.put_json("/api/x", &json!({})).await.unwrap();
    assert_eq!(echo.authorization.as_deref(), Some("Bearer first"));

    let relogged = client.with_token(store.get("token").unwrap().as_deref()).unwrap();
    let echo: Echo = relogged.get_json("/api/x").await.unwrap();
    assert_eq!(echo.authorization.as_deref(), Some("Bearer second"));
}

#[tokio::test]
async fn test_error_status_is_returned() {
    let addr = common::start_echo_backend().await;
    let client = ApiClient::new(&config_for(addr), None).unwrap();

    let err = client.delete("/api/items/fail").await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert!(body.contains("boom"));
        }
        other => panic!("expected status error, got {:?}", other),
    }

    client.delete("/api/items/1").await.unwrap();
}

#[tokio::test]
async fn test_token_from_file_store() {
    let addr = common::start_echo_backend().await;
    let path = common::unique_temp_path("test_token_from_file_store");
    std::fs::write(&path, r#"{ "token": "from-disk" }"#).unwrap();

    let store = JsonFileStore::open(&path).unwrap();
    let client = ApiClient::from_store(&config_for(addr), &store).unwrap();
    let echo: Echo = client.get_json("/api/me").await.unwrap();
    assert_eq!(echo.authorization.as_deref(), Some("Bearer from-disk"));

    std::fs::remove_file(&path).unwrap_or_default();
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Bind then drop to get a port nothing listens on
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = ApiClient::new(&config_for(addr), Some("t")).unwrap();

    let err = client.get_json::<serde_json::Value>("/").await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
}
