//! Request pipeline behavior outside the refresh path: envelope
//! decoding, 403 handling, and error normalization.

mod support;

use dashkit_client::{ApiClient, ApiError, ClientConfig, MemoryTokenStore, Part, Payload};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use support::{Harness, RecordingNavigator, RecordingSink};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u64,
    name: String,
}

#[tokio::test]
async fn success_decodes_envelope_and_meta() {
    let server = MockServer::start().await;
    let harness = Harness::with_session(&server, "valid-token", "refresh-1");

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer valid-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 1, "name": "Ada" },
                { "id": 2, "name": "Brian" }
            ],
            "meta": {
                "totalItems": 12,
                "itemCount": 2,
                "itemsPerPage": 2,
                "totalPages": 6,
                "currentPage": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = harness.client.get::<Vec<User>>("/users").await.unwrap();
    assert_eq!(
        envelope.data,
        vec![
            User { id: 1, name: "Ada".to_string() },
            User { id: 2, name: "Brian".to_string() },
        ]
    );
    let meta = envelope.meta.unwrap();
    assert_eq!(meta.total_items, 12);
    assert_eq!(meta.total_pages, 6);
}

#[tokio::test]
async fn post_sends_json_body_with_bearer_token() {
    let server = MockServer::start().await;
    let harness = Harness::with_session(&server, "valid-token", "refresh-1");

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("authorization", "Bearer valid-token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "name": "Carol" })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "data": { "id": 3, "name": "Carol" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let envelope = harness
        .client
        .post::<User>("/users", Payload::Json(json!({ "name": "Carol" })))
        .await
        .unwrap();
    assert_eq!(envelope.data.id, 3);
}

#[tokio::test]
async fn multipart_payload_uses_multipart_content_type() {
    let server = MockServer::start().await;
    let harness = Harness::with_session(&server, "valid-token", "refresh-1");

    Mock::given(method("POST"))
        .and(path("/uploads"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 1, "name": "f" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    harness
        .client
        .post::<User>(
            "/uploads",
            Payload::Multipart(vec![
                Part::text("title", "Quarterly report"),
                Part::file("file", "report.pdf", "application/pdf", vec![0x25, 0x50]),
            ]),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn forbidden_notifies_and_never_retries() {
    let server = MockServer::start().await;
    let harness = Harness::with_session(&server, "valid-token", "refresh-1");

    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "statusCode": 403,
            "message": "Forbidden resource"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let error = harness.client.get::<Value>("/admin").await.unwrap_err();
    match &error {
        ApiError::Forbidden(details) => {
            assert_eq!(details.status_code, 403);
            assert_eq!(details.message, "Forbidden resource");
        }
        other => panic!("expected Forbidden, got {other:?}"),
    }
    assert!(
        harness
            .sink
            .contains("You do not have permission to access this resource")
    );
    // No redirect and no session teardown on 403.
    assert!(harness.navigator.paths().is_empty());
}

#[tokio::test]
async fn other_statuses_normalize_with_body_fields() {
    let server = MockServer::start().await;
    let harness = Harness::with_session(&server, "valid-token", "refresh-1");

    Mock::given(method("DELETE"))
        .and(path("/users/9"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "statusCode": 422,
            "message": "Validation failed",
            "errors": [{ "field": "id", "message": "unknown user" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let error = harness
        .client
        .delete::<Value>("/users/9")
        .await
        .unwrap_err();
    match error {
        ApiError::Response(details) => {
            assert_eq!(details.status_code, 422);
            assert_eq!(details.message, "Validation failed");
            assert!(details.errors.is_some());
        }
        other => panic!("expected Response, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_body_falls_back_to_defaults() {
    let server = MockServer::start().await;
    let harness = Harness::with_session(&server, "valid-token", "refresh-1");

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let error = harness.client.get::<Value>("/flaky").await.unwrap_err();
    match error {
        ApiError::Response(details) => {
            assert_eq!(details.status_code, 502);
            assert_eq!(details.message, "Something went wrong");
        }
        other => panic!("expected Response, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_normalizes_to_500() {
    // Nothing listens on this address; the connection is refused.
    let config = ClientConfig::with_base_url("http://127.0.0.1:1").unwrap();
    let client = ApiClient::new(
        config,
        Arc::new(MemoryTokenStore::new()),
        Arc::new(RecordingSink::default()),
        Arc::new(RecordingNavigator::default()),
    )
    .unwrap();

    let error = client.get::<Value>("/users").await.unwrap_err();
    match error {
        ApiError::Response(details) => {
            assert_eq!(details.status_code, 500);
            assert!(!details.message.is_empty());
        }
        other => panic!("expected Response, got {other:?}"),
    }
}
