//! Integration tests for the shared request path

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use cis_core::header::{HeaderMap, HeaderValue};
use cis_core::{
    BaseService, BearerTokenAuthenticator, CoreError, NoAuthAuthenticator, ServiceInfo,
    ServiceRequest, StatusCode,
};
use flate2::read::GzDecoder;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::io::Read as _;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn info() -> ServiceInfo {
    ServiceInfo {
        service_name: "test_service",
        service_version: "V1",
        sdk_name: "cis-core-test",
        sdk_version: "0.0.1",
    }
}

fn service(server: &MockServer) -> BaseService {
    BaseService::new(info(), &server.uri(), Arc::new(NoAuthAuthenticator))
        .expect("Operation should succeed")
}

fn get_request() -> ServiceRequest {
    ServiceRequest::get("/v1/{crn}/items/{id}")
        .path_param("crn", "crn1")
        .path_param("id", "item1")
        .operation_id("GetItem")
}

#[tokio::test]
async fn test_get_decodes_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/crn1/items/item1"))
        .and(header("accept", "application/json"))
        .and(header(
            "x-ibmcloud-sdk-analytics",
            "service_name=test_service;service_version=V1;operation_id=GetItem",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "item1"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = service(&server)
        .request::<Value>(get_request())
        .await
        .expect("Operation should succeed");

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.result, Some(json!({"id": "item1"})));
}

#[tokio::test]
async fn test_empty_body_yields_no_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/crn1/items/item1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let response = service(&server)
        .request::<Value>(get_request())
        .await
        .expect("Operation should succeed");

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.result.is_none());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&server)
        .await;

    let err = service(&server)
        .request::<Value>(get_request())
        .await
        .expect_err("Test operation should fail");

    assert!(matches!(err, CoreError::Decode { status, .. } if status == StatusCode::OK));
}

#[tokio::test]
async fn test_error_response_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "errors": [{"code": 1007, "message": "Invalid value for zone setting"}],
            "messages": [],
            "result": null
        })))
        .mount(&server)
        .await;

    let err = service(&server)
        .request::<Value>(get_request())
        .await
        .expect_err("Test operation should fail");

    match err {
        CoreError::Service {
            status,
            message,
            body,
            ..
        } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Invalid value for zone setting");
            assert!(body.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_without_body_uses_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = service(&server)
        .request::<Value>(get_request())
        .await
        .expect_err("Test operation should fail");

    assert!(matches!(err, CoreError::Service { ref message, .. } if message == "Not Found"));
    assert_eq!(err.status_code(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_retry_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/crn1/items/item1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/crn1/items/item1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = service(&server);
    service.enable_retries(3, Duration::from_millis(10));

    let response = service
        .request::<Value>(get_request())
        .await
        .expect("Operation should succeed");
    assert_eq!(response.result, Some(json!({"ok": true})));
}

#[tokio::test]
async fn test_retries_disabled_returns_first_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = service(&server);
    service.enable_retries(3, Duration::from_millis(10));
    service.disable_retries();

    let err = service
        .request::<Value>(get_request())
        .await
        .expect_err("Test operation should fail");
    assert_eq!(err.status_code(), Some(StatusCode::SERVICE_UNAVAILABLE));
}

#[tokio::test]
async fn test_retry_after_header_is_honoured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let mut service = service(&server);
    // A long backoff cap: only the zero Retry-After keeps this test fast
    service.enable_retries(1, Duration::from_secs(60));

    let response = tokio::time::timeout(
        Duration::from_secs(5),
        service.request::<Value>(get_request()),
    )
    .await
    .expect("Retry-After should shorten the backoff")
    .expect("Operation should succeed");
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_deadline_exceeded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = service(&server)
        .request::<Value>(get_request().timeout(Some(Duration::from_millis(50))))
        .await
        .expect_err("Test operation should fail");

    assert!(matches!(err, CoreError::DeadlineExceeded(d) if d == Duration::from_millis(50)));
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_headers_and_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(header("authorization", "Bearer secret-token"))
        .and(header("x-default", "from-service"))
        .and(header("x-call", "from-request"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let auth = BearerTokenAuthenticator::new("secret-token").expect("Operation should succeed");
    let mut service =
        BaseService::new(info(), &server.uri(), Arc::new(auth)).expect("Operation should succeed");
    let mut defaults = HeaderMap::new();
    defaults.insert("x-default", HeaderValue::from_static("from-service"));
    service.set_default_headers(defaults);

    let request = ServiceRequest::patch("/v1/{crn}/items/{id}")
        .path_param("crn", "crn1")
        .path_param("id", "item1")
        .header("X-Call", "from-request")
        .expect("Operation should succeed")
        .json(&json!({"value": 1}))
        .expect("Operation should succeed");

    service
        .request::<Value>(request)
        .await
        .expect("Operation should succeed");
}

#[tokio::test]
async fn test_gzip_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(header("content-encoding", "gzip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = service(&server);
    service.set_enable_gzip_compression(true);

    let request = ServiceRequest::patch("/v1/{crn}/items/{id}")
        .path_param("crn", "crn1")
        .path_param("id", "item1")
        .json(&json!({"value": "on"}))
        .expect("Operation should succeed");
    service
        .request::<Value>(request)
        .await
        .expect("Operation should succeed");

    let received = server.received_requests().await.expect("recording enabled");
    let mut decoder = GzDecoder::new(received[0].body.as_slice());
    let mut decoded = String::new();
    decoder
        .read_to_string(&mut decoded)
        .expect("body should be gzip");
    assert_eq!(decoded, r#"{"value":"on"}"#);
}

#[tokio::test]
async fn test_validation_error_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = ServiceRequest::get("/v1/{crn}/items/{id}").path_param("crn", "crn1");
    let err = service(&server)
        .request::<Value>(request)
        .await
        .expect_err("Test operation should fail");
    assert!(matches!(err, CoreError::Validation(_)));
}
