//! Integration tests for `RemoteFileClient::fetch`.
//!
//! Uses `wiremock` to stand up a local HTTP server per test so no real
//! network traffic is made.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use promos_ingest::{IngestError, RemoteFileClient};

fn test_client() -> RemoteFileClient {
    RemoteFileClient::new(5, "promos-test/0.1").expect("failed to build test RemoteFileClient")
}

#[tokio::test]
async fn fetch_returns_body_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/promos.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let body = test_client()
        .fetch(&format!("{}/promos.json", server.uri()))
        .await
        .expect("fetch should succeed");

    assert_eq!(body, b"[]");
}

#[tokio::test]
async fn fetch_fails_on_non_200_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch(&format!("{}/missing.json", server.uri()))
        .await
        .unwrap_err();

    match err {
        IngestError::Download { reason, .. } => {
            assert!(reason.contains("404"), "unexpected reason: {reason}");
        }
        other => panic!("expected Download error, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_treats_other_success_codes_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = test_client().fetch(&server.uri()).await;

    assert!(matches!(result, Err(IngestError::Download { .. })));
}

#[tokio::test]
async fn fetch_fails_on_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty.csv"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch(&format!("{}/empty.csv", server.uri()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, IngestError::Download { ref reason, .. } if reason == "empty response body"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = RemoteFileClient::new(1, "promos-test/0.1").expect("client");
    let result = client.fetch(&server.uri()).await;

    assert!(matches!(result, Err(IngestError::Download { .. })));
}

#[tokio::test]
async fn fetch_rejects_invalid_url() {
    let result = test_client().fetch("not a url").await;
    assert!(matches!(result, Err(IngestError::Download { .. })));
}
