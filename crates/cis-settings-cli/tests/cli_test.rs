//! Integration tests for the cis-settings CLI

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SETTINGS_PATH: &str = "/v1/crn1/zones/zone1/settings";

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("cis-settings").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("CIS_CRN")
        .env_remove("CIS_ZONE_ID")
        .env_remove("ZONES_SETTINGS_URL")
        .env_remove("ZONES_SETTINGS_AUTH_TYPE")
        .env_remove("ZONES_SETTINGS_ENABLE_RETRIES");
    cmd
}

fn cli_against(server: &MockServer) -> Command {
    let mut cmd = cli();
    cmd.env("CIS_CRN", "crn1")
        .env("CIS_ZONE_ID", "zone1")
        .env("ZONES_SETTINGS_URL", server.uri());
    cmd
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("command-line tool for the CIS zone settings API"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("dnssec"))
        .stdout(predicate::str::contains("log-retention"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cis-settings"));
}

#[test]
fn test_list_json() {
    cli()
        .args(["-o", "json", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"min_tls_version\""))
        .stdout(predicate::str::contains("\"bot_management\""));
}

#[test]
fn test_unknown_setting() {
    cli()
        .args(["get", "warp_drive", "--crn", "crn1", "--zone", "zone1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid zone setting"));
}

#[test]
fn test_missing_crn() {
    cli()
        .args(["get", "http2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CIS_CRN"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_setting() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{SETTINGS_PATH}/always_use_https")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"id": "always_use_https", "value": "on", "editable": true},
            "success": true,
            "errors": [],
            "messages": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["-o", "json", "get", "always-use-https"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\":\"on\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_setting() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("{SETTINGS_PATH}/min_tls_version")))
        .and(body_json(json!({"value": "1.2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"id": "min_tls_version", "value": "1.2"},
            "success": true,
            "errors": [],
            "messages": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["set", "min_tls_version", "1.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated min_tls_version"))
        .stdout(predicate::str::contains("1.2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_rejects_invalid_value() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["set", "http2", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for setting 'http2'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_log_retention_set() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/crn1/zones/zone1/logs/retention"))
        .and(body_json(json!({"flag": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"flag": false},
            "success": true,
            "errors": [],
            "messages": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["log-retention", "set", "off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Log retention: off"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_service_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "errors": [{"code": 10000, "message": "Authentication error"}]
        })))
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["dnssec", "get"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication error"));
}

fn setting_body(id: &str, value: &str) -> serde_json::Value {
    json!({
        "result": {"id": id, "value": value, "editable": true},
        "success": true,
        "errors": [],
        "messages": []
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_setting_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{SETTINGS_PATH}/http2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting_body("http2", "on")))
        .expect(1)
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["get", "http2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Setting"))
        .stdout(predicate::str::contains("Editable"))
        .stdout(predicate::str::contains("http2"))
        .stdout(predicate::str::contains("on"))
        .stdout(predicate::str::contains("true"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_all_reports_values_and_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{SETTINGS_PATH}/http2")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "errors": [{"code": 1000, "message": "backend exploded"}]
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/v1/crn1/zones/zone1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting_body("any", "on")))
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["-o", "json", "all", "--concurrency", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ipv6\":\"on\""))
        .stdout(predicate::str::contains("\"http2\":{\"error\""))
        .stdout(predicate::str::contains("backend exploded"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_all_text_shows_error_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{SETTINGS_PATH}/waf")))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/v1/crn1/zones/zone1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting_body("any", "off")))
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("waf"))
        .stdout(predicate::str::contains("500"))
        .stdout(predicate::str::contains("off"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dnssec_set() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/crn1/zones/zone1/dnssec"))
        .and(body_json(json!({"status": "active"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"status": "active", "flags": 257, "algorithm": "13"},
            "success": true,
            "errors": [],
            "messages": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["dnssec", "set", "active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DNSSEC"))
        .stdout(predicate::str::contains("active"))
        .stdout(predicate::str::contains("257"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gzip_flag_compresses_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("{SETTINGS_PATH}/http3")))
        .and(header("content-encoding", "gzip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting_body("http3", "on")))
        .expect(1)
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["--gzip", "set", "http3", "on"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated http3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeout_flag_reports_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{SETTINGS_PATH}/ipv6")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(setting_body("ipv6", "on"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["--timeout", "1", "get", "ipv6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deadline"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_max_retries_flag_retries_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{SETTINGS_PATH}/websockets")))
        .respond_with(ResponseTemplate::new(503).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{SETTINGS_PATH}/websockets")))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting_body("websockets", "on")))
        .expect(1)
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["--max-retries", "2", "-o", "json", "get", "websockets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\":\"on\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_without_max_retries_transient_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{SETTINGS_PATH}/websockets")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    cli_against(&server)
        .args(["get", "websockets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("503"));
}
