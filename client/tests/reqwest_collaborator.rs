//! End-to-end tests for the `reqwest` collaborator behind the normalizer.
//!
//! A `wiremock` server stands in for the booking backend.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use salon_booking_client::{
    ClientConfig, HttpCollaborator, HttpError, NO_RESPONSE_MESSAGE, OriginalError,
    ReqwestHttpClient, ServiceCallNormalizer, ServiceError,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestHttpClient {
    ReqwestHttpClient::new(&ClientConfig::new(server.uri())).unwrap()
}

#[tokio::test]
async fn success_envelope_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "0",
            "msg": "ok",
            "data": [{"id": "svc-1", "title": "Haircut"}]
        })))
        .mount(&server)
        .await;

    let http = client_for(&server);
    let result = ServiceCallNormalizer::new()
        .invoke_value(|| http.get("/services"))
        .await;

    assert_eq!(result, Ok(json!([{"id": "svc-1", "title": "Haircut"}])));
}

#[tokio::test]
async fn plain_body_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/staff/7/availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["09:00", "09:30"])))
        .mount(&server)
        .await;

    let http = client_for(&server);
    let times: Vec<String> = ServiceCallNormalizer::new()
        .invoke(|| http.get("/staff/7/availability"))
        .await
        .unwrap();

    assert_eq!(times, vec!["09:00".to_string(), "09:30".to_string()]);
}

#[tokio::test]
async fn http_500_uses_body_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "server exploded"})),
        )
        .mount(&server)
        .await;

    let http = client_for(&server);
    let error = ServiceCallNormalizer::new()
        .invoke_value(|| http.post("/appointments", json!({"serviceId": "svc-1"})))
        .await
        .unwrap_err();

    assert_eq!(error.message(), "server exploded");
    assert_eq!(error.status_code(), Some(500));
    assert!(matches!(
        error.original_error(),
        OriginalError::Http(HttpError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn non_json_error_body_is_used_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let http = client_for(&server);
    let error = ServiceCallNormalizer::new()
        .invoke_value(|| http.get("/services"))
        .await
        .unwrap_err();

    assert_eq!(error.message(), "Bad Gateway");
    assert_eq!(error.status_code(), Some(502));
}

#[tokio::test]
async fn non_json_success_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let http = client_for(&server);
    let error = ServiceCallNormalizer::new()
        .invoke_value(|| http.get("/services"))
        .await
        .unwrap_err();

    assert!(matches!(error, ServiceError::MalformedResponse { .. }));
    assert_eq!(error.status_code(), Some(200));
}

#[tokio::test]
async fn post_sends_json_body_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sales"))
        .and(header("authorization", "Bearer merchant-token"))
        .and(body_json(json!({"items": ["svc-1"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "0",
            "msg": "ok",
            "data": {"saleId": "sale-9"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri()).with_auth_token("merchant-token");
    let http = ReqwestHttpClient::new(&config).unwrap();
    let result = ServiceCallNormalizer::new()
        .invoke_value(|| http.post("/sales", json!({"items": ["svc-1"]})))
        .await;

    assert_eq!(result, Ok(json!({"saleId": "sale-9"})));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let http = ReqwestHttpClient::new(&ClientConfig::new(uri).with_timeout_secs(2)).unwrap();
    let error = ServiceCallNormalizer::new()
        .invoke_value(|| http.get("/services"))
        .await
        .unwrap_err();

    assert!(matches!(error, ServiceError::Network { .. }));
    assert_eq!(error.to_string(), NO_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn truncated_body_is_malformed_not_unreachable() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Announce more bytes than are sent, then hang up.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\n\r\n{\"code\":",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let http = ReqwestHttpClient::new(&ClientConfig::new(uri).with_timeout_secs(5)).unwrap();
    let error = ServiceCallNormalizer::new()
        .invoke_value(|| http.get("/services"))
        .await
        .unwrap_err();

    assert!(matches!(error, ServiceError::MalformedResponse { .. }));
    assert_eq!(error.status_code(), Some(200));
    assert_ne!(error.to_string(), NO_RESPONSE_MESSAGE);
}
