//! Integration tests for HTTP acquisition

use gapwatch::services::{GapApiClient, SnapshotSource};
use gapwatch::{AcquisitionError, MarketState};
use tokio::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_utils::{endpoint, gap_body, mock_gap, GAP_PATH};

#[tokio::test]
async fn fetches_and_classifies_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GAP_PATH))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gap_body("12,54%")))
        .expect(1)
        .mount(&server)
        .await;

    let client = GapApiClient::new();
    let snapshot = client
        .fetch_snapshot(&endpoint(&server))
        .await
        .expect("snapshot");

    assert_eq!(snapshot.official_rate, "36,52");
    assert_eq!(snapshot.parallel_rate, "41,10");
    assert_eq!(snapshot.gap_absolute, "4,58");
    assert_eq!(snapshot.gap_percent, "12,54%");
    assert_eq!(snapshot.observed_at, "17/10/2026 09:30");
    assert_eq!(snapshot.state, MarketState::Devaluation);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = GapApiClient::new()
        .fetch_snapshot(&endpoint(&server))
        .await
        .unwrap_err();
    assert_eq!(err, AcquisitionError::HttpStatus(503));
}

#[tokio::test]
async fn missing_gap_field_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "analisis": {} })))
        .mount(&server)
        .await;

    let err = GapApiClient::new()
        .fetch_snapshot(&endpoint(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, AcquisitionError::MalformedPayload(_)), "{:?}", err);
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = GapApiClient::new()
        .fetch_snapshot(&endpoint(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, AcquisitionError::MalformedPayload(_)), "{:?}", err);
}

#[tokio::test]
async fn unparseable_gap_is_fail_soft() {
    let server = MockServer::start().await;
    mock_gap(&server, "n/d").await;

    let snapshot = GapApiClient::new()
        .fetch_snapshot(&endpoint(&server))
        .await
        .expect("fail-soft parse still yields a snapshot");
    assert_eq!(snapshot.gap_value(), 0.0);
    assert_eq!(snapshot.gap_percent, "n/d");
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gap_body("7,00%"))
                .set_delay(Duration::from_millis(9_000)),
        )
        .mount(&server)
        .await;

    let started = Instant::now();
    let err = GapApiClient::new()
        .fetch_snapshot(&endpoint(&server))
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "{:?}", err);
    assert!(started.elapsed() < Duration::from_millis(9_000));
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let err = GapApiClient::new()
        .fetch_snapshot(&format!("http://127.0.0.1:{}{}", port, GAP_PATH))
        .await
        .unwrap_err();
    assert!(matches!(err, AcquisitionError::NetworkOrCors(_)), "{:?}", err);
}
