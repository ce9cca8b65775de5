//! Integration tests for configuration loader and the `connect()` factory
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! turning it into a working client.

use std::io::Write;

use serde_json::json;
use studentportal_domain::{Config, SessionBackend, SessionConfig};
use studentportal_infra::{config, connect};
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "api": {
            "base_url": "http://127.0.0.1:8000/api/",
            "timeout_ms": 4000,
            "user_agent": "portal-tests"
        },
        "session": {
            "backend": "file",
            "path": "/tmp/portal-test/session.json"
        },
        "logging": {
            "level": "studentportal=debug",
            "format": "json"
        }
    }"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.api.base_url, "http://127.0.0.1:8000/api");
    assert_eq!(config.api.timeout_ms, 4000);
    assert_eq!(config.api.user_agent, "portal-tests");
    assert_eq!(config.session.backend, SessionBackend::File);
    assert_eq!(config.logging.level, "studentportal=debug");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_empty_toml_file_uses_defaults() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let config = config::load_from_file(Some(path.clone())).expect("config should load");
    assert_eq!(config, Config::default());

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_connect_builds_working_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "tok123"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let session_path = dir.path().join("session.json");
    let mut config = Config::default();
    config.api.base_url = format!("{}/api", server.uri());
    config.session = SessionConfig {
        backend: SessionBackend::File,
        path: Some(session_path.clone()),
        ..SessionConfig::default()
    };

    let api = connect(&config).expect("connect");
    api.login("valid_user", "valid_pass").await.expect("login");

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&session_path).unwrap()).unwrap();
    assert_eq!(saved["token"], "tok123");

    let reconnected = connect(&config).expect("reconnect");
    assert!(reconnected.is_authenticated().await);
}

#[test]
fn test_connect_rejects_invalid_base_url() {
    let mut config = Config::default();
    config.api.base_url = "::not a url::".to_string();
    config.session.backend = SessionBackend::Memory;

    assert!(connect(&config).is_err());
}
