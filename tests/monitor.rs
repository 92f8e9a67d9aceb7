//! Communications monitoring endpoints against a mock server.

use dolbyio_rest::{
    Client, ClientBuilder, ConferenceFilter, Credential, Error, Hostnames, PageLimits,
    ParticipantFilter, RecordingFilter, WebhookFilter,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    ClientBuilder::new()
        .credential(Credential::bearer("test-token"))
        .hostnames(Hostnames::all(server.uri()))
        .build()
        .unwrap()
}

fn conference(id: &str) -> serde_json::Value {
    json!({"confId": id, "confAlias": format!("alias-{id}"), "start": 1690000000000u64})
}

#[tokio::test]
async fn list_all_conferences_follows_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/conferences"))
        .and(query_param("start", "tok1"))
        .and(query_param("max", "2"))
        .and(query_param("from", "1000"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conferences": [conference("c")],
            "next": ""
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/conferences"))
        .and(query_param("max", "2"))
        .and(query_param("from", "1000"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conferences": [conference("a"), conference("b")],
            "next": "tok1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = ConferenceFilter {
        from: Some(1000),
        max: Some(2),
        ..Default::default()
    };
    let conferences = client_for(&server)
        .list_all_conferences(&filter)
        .await
        .unwrap();

    let ids: Vec<&str> = conferences.iter().map(|c| c.conf_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(conferences[2].conf_alias, "alias-c");
}

#[tokio::test]
async fn list_all_ignores_caller_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/recordings"))
        .and(query_param("start", "stale"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/recordings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recordings": [{"confId": "c1", "confAlias": "a", "ts": 5, "region": "eu"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = RecordingFilter {
        start: Some("stale".into()),
        ..Default::default()
    };
    let recordings = client_for(&server).list_all_recordings(&filter).await.unwrap();

    assert_eq!(recordings.len(), 1);
    assert_eq!(recordings[0].region.as_deref(), Some("eu"));
}

#[tokio::test]
async fn single_page_listing_returns_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/webhooks"))
        .and(query_param("start", "page-3"))
        .and(query_param("type", "Conference.Ended"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "webhooks": [{
                "id": "w1",
                "webhook": "Conference.Ended",
                "url": "https://hooks.example.com",
                "confId": "c1",
                "ts": 42,
                "response": {"status": 200, "body": "ok"}
            }],
            "next": "page-4"
        })))
        .mount(&server)
        .await;

    let filter = WebhookFilter {
        start: Some("page-3".into()),
        event: Some("Conference.Ended".into()),
        ..Default::default()
    };
    let page = client_for(&server).list_webhooks(&filter).await.unwrap();

    assert!(page.has_more());
    assert_eq!(page.next.as_deref(), Some("page-4"));
    assert_eq!(page.items[0].response.as_ref().map(|r| r.status), Some(200));
}

#[tokio::test]
async fn participants_merge_by_user_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/conferences/c1/participants"))
        .and(query_param("start", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "participants": {
                "u1": {"userId": "u1", "name": "Ada (rejoined)"},
                "u3": {"userId": "u3", "name": "Grace"}
            }
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/conferences/c1/participants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "participants": {
                "u1": {"userId": "u1", "name": "Ada"},
                "u2": {"userId": "u2", "name": "Linus", "connections": [{"ipAddress": "10.0.0.1"}]}
            },
            "next": "p2"
        })))
        .mount(&server)
        .await;

    let participants = client_for(&server)
        .list_all_participants("c1", &ParticipantFilter::default())
        .await
        .unwrap();

    assert_eq!(participants.len(), 3);
    assert_eq!(participants["u1"].name.as_deref(), Some("Ada (rejoined)"));
    assert_eq!(
        participants["u2"].connections[0].ip_address.as_deref(),
        Some("10.0.0.1")
    );
}

#[tokio::test]
async fn get_conference_requests_livestats() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/conferences/c9"))
        .and(query_param("livestats", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "confId": "c9",
            "confAlias": "standup",
            "start": 1,
            "live": true,
            "statistics": {"maxParticipants": {"USER": 4}}
        })))
        .mount(&server)
        .await;

    let conf = client_for(&server).get_conference("c9", true).await.unwrap();
    assert!(conf.live);
    assert_eq!(conf.statistics.unwrap()["maxParticipants"]["USER"], 4);
}

#[tokio::test]
async fn conference_id_is_escaped_in_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/conferences/a%2Fb%3Fc%23d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "confId": "a/b?c#d",
            "confAlias": "odd",
            "start": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/conferences/a%2Fb%3Fc%23d/participants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "participants": {"u1": {"userId": "u1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let conf = client.get_conference("a/b?c#d", false).await.unwrap();
    assert_eq!(conf.conf_id, "a/b?c#d");

    let participants = client
        .list_all_participants("a/b?c#d", &ParticipantFilter::default())
        .await
        .unwrap();
    assert_eq!(participants.len(), 1);
}

#[tokio::test]
async fn failed_page_aborts_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/conferences"))
        .and(query_param("start", "tok1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "expired_token"
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/conferences"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conferences": [conference("a")],
            "next": "tok1"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_all_conferences(&ConferenceFilter::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Authentication { ref message } if message == "expired_token"));
}

#[tokio::test]
async fn page_limit_from_builder_applies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/webhooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "webhooks": [],
            "next": "always-more"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ClientBuilder::new()
        .credential(Credential::api_key("key"))
        .hostnames(Hostnames::all(server.uri()))
        .page_limits(PageLimits::max_pages(1))
        .build()
        .unwrap();

    let err = client
        .list_all_webhooks(&WebhookFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PageLimitExceeded { max_pages: 1, .. }));
}

#[tokio::test]
async fn shape_mismatch_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/monitor/recordings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recordings": [{"confId": "c1"}]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_recordings(&RecordingFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { ref context, .. } if context == "recordings"));
}
