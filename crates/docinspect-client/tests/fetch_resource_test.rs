//! Integration tests for the resource API client against a mock server.

use docinspect_client::{ApiClient, ApiConfig};
use docinspect_core::{AccessToken, DocumentChunkId, Error};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHUNK_ID: &str = "doc-12345-chunk-67890";
const CHUNK_PATH: &str = "/api/document/items/doc-12345-chunk-67890/itemspec";

fn client(server: &MockServer) -> ApiClient {
    let config = ApiConfig::default().with_base_url(format!("{}/api/document", server.uri()));
    ApiClient::new(config).expect("Failed to create client")
}

fn token() -> AccessToken {
    AccessToken::new("test-token")
}

async fn respond_with(status: u16, body: &str) -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHUNK_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    let client = client(&server);
    (server, client)
}

#[tokio::test]
async fn test_fetch_sends_bearer_and_json_headers() {
    let server = MockServer::start().await;

    let payload = serde_json::json!({
        "itemSpec": {
            "metadata": {
                "document-chunk-id": CHUNK_ID,
                "title": "Intro"
            },
            "content": "Hello"
        }
    });

    Mock::given(method("GET"))
        .and(path(CHUNK_PATH))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .expect(1)
        .mount(&server)
        .await;

    let chunk = client(&server)
        .fetch_resource(&DocumentChunkId::new(CHUNK_ID), &token())
        .await
        .expect("fetch should succeed");

    assert_eq!(chunk.metadata.id, CHUNK_ID);
    assert_eq!(chunk.metadata.title, "Intro");
    assert_eq!(chunk.metadata.last_updated, None);
    assert_eq!(chunk.metadata.depot_name, None);
    assert_eq!(chunk.metadata.page_type, None);
    assert_eq!(chunk.metadata.url, None);
    assert_eq!(chunk.content, "Hello");
}

#[tokio::test]
async fn test_empty_object_yields_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/document/items/x/itemspec"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let chunk = client(&server)
        .fetch_resource(&DocumentChunkId::new("x"), &token())
        .await
        .unwrap();

    assert_eq!(chunk.metadata.id, "x");
    assert_eq!(chunk.metadata.title, "Untitled Document");
    assert_eq!(chunk.content, "No content available");
}

#[tokio::test]
async fn test_401_is_auth_expired() {
    let (_server, client) = respond_with(401, "").await;
    let err = client
        .fetch_resource(&DocumentChunkId::new(CHUNK_ID), &token())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AuthExpired));
}

#[tokio::test]
async fn test_403_is_access_denied() {
    let (_server, client) = respond_with(403, "forbidden").await;
    let err = client
        .fetch_resource(&DocumentChunkId::new(CHUNK_ID), &token())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AccessDenied));
}

#[tokio::test]
async fn test_404_is_resource_not_found() {
    let (_server, client) = respond_with(404, "").await;
    let err = client
        .fetch_resource(&DocumentChunkId::new(CHUNK_ID), &token())
        .await
        .unwrap_err();
    match err {
        Error::ResourceNotFound(id) => assert_eq!(id, CHUNK_ID),
        other => panic!("Expected ResourceNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_500_carries_status_and_body() {
    let (_server, client) = respond_with(500, "oops").await;
    let err = client
        .fetch_resource(&DocumentChunkId::new(CHUNK_ID), &token())
        .await
        .unwrap_err();
    match err {
        Error::ApiError { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "oops");
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_long_error_body_is_not_truncated() {
    let body = "x".repeat(10_000);
    let (_server, client) = respond_with(502, &body).await;
    let err = client
        .fetch_resource(&DocumentChunkId::new(CHUNK_ID), &token())
        .await
        .unwrap_err();
    match err {
        Error::ApiError { status, body: got } => {
            assert_eq!(status, 502);
            assert_eq!(got.len(), 10_000);
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_transport_error() {
    let (_server, client) = respond_with(200, "<html>not json</html>").await;
    let err = client
        .fetch_resource(&DocumentChunkId::new(CHUNK_ID), &token())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Nothing listens on port 1.
    let config = ApiConfig::default().with_base_url("http://127.0.0.1:1/api/document");
    let client = ApiClient::new(config).unwrap();

    let err = client
        .fetch_resource(&DocumentChunkId::new(CHUNK_ID), &token())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/document/health"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert!(client(&server).health_check(&token()).await);
}

#[tokio::test]
async fn test_health_check_unhealthy_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/document/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(!client(&server).health_check(&token()).await);
}

#[tokio::test]
async fn test_health_check_unhealthy_when_unreachable() {
    let config = ApiConfig::default().with_base_url("http://127.0.0.1:1/api/document");
    let client = ApiClient::new(config).unwrap();

    assert!(!client.health_check(&token()).await);
}
