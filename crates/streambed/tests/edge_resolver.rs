//! Edge resolver tests against a mocked stream manager.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use streambed::sm_client::{SmClient, SmClientError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_stream_manager(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/streammanager/api/1.0/event/live/mystream"))
        .and(query_param("action", "subscribe"))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_resolves_server_address_from_json_response() {
    let server = mock_stream_manager(
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"serverAddress": "1.2.3.4"})),
    )
    .await;

    let client = SmClient::new(server.uri()).expect("client should build");
    let address = client
        .resolve_edge("live", "mystream")
        .await
        .expect("resolution should succeed");

    assert_eq!(address, "1.2.3.4");
}

#[tokio::test]
async fn test_rejects_non_json_content_type() {
    let server = mock_stream_manager(
        ResponseTemplate::new(200).set_body_string(r#"{"serverAddress": "1.2.3.4"}"#),
    )
    .await;

    let client = SmClient::new(server.uri()).expect("client should build");
    let result = client.resolve_edge("live", "mystream").await;

    assert!(matches!(
        result,
        Err(SmClientError::UnexpectedContentType(_))
    ));
}

#[tokio::test]
async fn test_accepts_json_content_type_with_charset() {
    let server = mock_stream_manager(
        ResponseTemplate::new(200)
            .set_body_raw(
                r#"{"serverAddress": "1.2.3.4"}"#,
                "application/json; charset=utf-8",
            ),
    )
    .await;

    let client = SmClient::new(server.uri()).expect("client should build");
    let address = client
        .resolve_edge("live", "mystream")
        .await
        .expect("resolution should succeed");

    assert_eq!(address, "1.2.3.4");
}

#[tokio::test]
async fn test_non_success_status_reports_truncated_body() {
    let long_body = "x".repeat(1000);
    let server = mock_stream_manager(
        ResponseTemplate::new(503).set_body_string(long_body),
    )
    .await;

    let client = SmClient::new(server.uri()).expect("client should build");
    let result = client.resolve_edge("live", "mystream").await;

    match result {
        Err(SmClientError::RequestFailed { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.ends_with("...[truncated]"));
            assert!(body.len() < 1000);
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_json_body_without_server_address_is_a_parse_error() {
    let server = mock_stream_manager(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"scope": "live"})),
    )
    .await;

    let client = SmClient::new(server.uri()).expect("client should build");
    let result = client.resolve_edge("live", "mystream").await;

    assert!(matches!(result, Err(SmClientError::Json(_))));
}

#[tokio::test]
async fn test_network_failure_surfaces_http_error() {
    // Nothing listens on this address.
    let client = SmClient::new("http://127.0.0.1:9").expect("client should build");
    let result = client.resolve_edge("live", "mystream").await;

    assert!(matches!(result, Err(SmClientError::Http(_))));
}
