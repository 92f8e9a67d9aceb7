//! Streaming endpoints against a mock server.

use dolbyio_rest::{
    Client, ClientBuilder, CreatePublishToken, Credential, Error, Hostnames, TokenStream,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    ClientBuilder::new()
        .credential(Credential::bearer("api-secret"))
        .hostnames(Hostnames::default().streaming(server.uri()))
        .build()
        .unwrap()
}

fn token_json() -> serde_json::Value {
    json!({
        "id": 17,
        "label": "studio",
        "token": "3f7a...",
        "addedOn": "2024-05-01T10:00:00Z",
        "expiresOn": null,
        "isActive": true,
        "streams": [{"streamName": "main", "isRegex": false}],
        "allowedOrigins": ["https://studio.example.com"],
        "record": false
    })
}

#[tokio::test]
async fn create_publish_token_unwraps_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/publish_token"))
        .and(header("authorization", "Bearer api-secret"))
        .and(body_json(json!({
            "label": "studio",
            "streams": [{"streamName": "main", "isRegex": false}],
            "allowedOrigins": ["https://studio.example.com"]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success", "data": token_json()})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let token = client_for(&server)
        .create_publish_token(&CreatePublishToken {
            label: "studio".into(),
            streams: vec![TokenStream::named("main")],
            allowed_origins: vec!["https://studio.example.com".into()],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(token.id, 17);
    assert!(token.is_active);
    assert!(token.expires_on.is_none());
    assert_eq!(token.streams, vec![TokenStream::named("main")]);
}

#[tokio::test]
async fn read_and_delete_publish_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/publish_token/17"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success", "data": token_json()})),
        )
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/publish_token/17"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "success", "data": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = client.read_publish_token(17).await.unwrap();
    assert_eq!(token.label, "studio");
    assert!(client.delete_publish_token(17).await.unwrap());
}

#[tokio::test]
async fn missing_token_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/publish_token/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "fail",
            "data": {"message": "Token not found"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).read_publish_token(99).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn read_cluster() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cluster"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "default": {"id": "iad-1", "name": "Ashburn", "rtmp": "rtmp-iad-1.example.net"},
                "available": [
                    {"id": "iad-1", "name": "Ashburn", "rtmp": "rtmp-iad-1.example.net"},
                    {"id": "fra-1", "name": "Frankfurt"}
                ]
            }
        })))
        .mount(&server)
        .await;

    let cluster = client_for(&server).read_cluster().await.unwrap();
    assert_eq!(cluster.default.id, "iad-1");
    assert_eq!(cluster.available.len(), 2);
    assert!(cluster.available[1].rtmp.is_none());
}

#[tokio::test]
async fn rate_limit_reads_retry_after_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cluster"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "30")
                .set_body_json(json!({"message": "slow down"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).read_cluster().await.unwrap_err();
    match err {
        Error::RateLimit {
            message,
            retry_after,
        } => {
            assert_eq!(message, "slow down");
            assert_eq!(retry_after, Some(30));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
