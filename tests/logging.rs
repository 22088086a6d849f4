//! Shape and content of the structured log records.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use contact_service::config::validation::ValidationError;
use contact_service::config::ConfigError;
use contact_service::lifecycle::startup::log_config_error;
use contact_service::observability::logging::json_layer;
use contact_service::{HttpServer, ServiceConfig};
use serde_json::Value;
use tower::ServiceExt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

mod common;

use common::contact_request;

/// In-memory sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    fn records(&self) -> Vec<Value> {
        self.text()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn record(&self, message: &str) -> Value {
        self.records()
            .into_iter()
            .find(|r| r["message"] == message)
            .unwrap_or_else(|| panic!("no record {:?} in {}", message, self.text()))
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(json_layer(logs.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

fn keys(record: &Value) -> BTreeSet<&str> {
    record
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect()
}

fn assert_envelope_fields(record: &Value, level: &str) {
    let timestamp = record["timestamp"].as_str().unwrap();
    assert!(timestamp.contains('T') && timestamp.ends_with('Z'), "{}", timestamp);
    assert_eq!(record["level"], level);
}

#[tokio::test]
async fn test_accepted_inquiry_record_omits_message_text() {
    let (logs, _guard) = capture();
    let app = HttpServer::new(ServiceConfig::default()).router();

    let mut request = contact_request(
        "203.0.113.5",
        r#"{"name":"Jane","email":"jane@example.com","message":"confidential-note-42"}"#,
    );
    request
        .headers_mut()
        .insert("x-request-id", "log-check-1".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let record = logs.record("New inquiry received");
    assert_envelope_fields(&record, "INFO");
    assert_eq!(
        keys(&record),
        BTreeSet::from([
            "timestamp",
            "level",
            "message",
            "name",
            "email",
            "message_length",
            "remote_ip",
            "request_id",
        ])
    );
    assert_eq!(record["name"], "Jane");
    assert_eq!(record["email"], "jane@example.com");
    assert_eq!(record["message_length"], "confidential-note-42".len());
    assert_eq!(record["remote_ip"], "203.0.113.5");
    assert_eq!(record["request_id"], "log-check-1");

    assert!(!logs.text().contains("confidential-note-42"));
}

#[tokio::test]
async fn test_malformed_body_is_never_logged() {
    let (logs, _guard) = capture();
    let app = HttpServer::new(ServiceConfig::default()).router();

    let raw = r#"{"name":"Jane","message":"raw-body-secret-99""#;
    let response = app.oneshot(contact_request("203.0.113.6", raw)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let record = logs.record("Failed to decode request body");
    assert_envelope_fields(&record, "WARN");
    assert_eq!(
        keys(&record),
        BTreeSet::from(["timestamp", "level", "message", "error", "remote_ip", "request_id"])
    );
    assert_eq!(record["remote_ip"], "203.0.113.6");
    assert!(!record["request_id"].as_str().unwrap().is_empty());

    let text = logs.text();
    assert!(!text.contains("raw-body-secret-99"));
    assert!(!text.contains(raw));
}

#[test]
fn test_config_failure_is_logged_as_json() {
    let (logs, _guard) = capture();
    let error = ConfigError::Validation(vec![ValidationError::Zero("rate_limit.requests")]);

    log_config_error(&error, Some(Path::new("/etc/contact-service.toml")));

    let record = logs.record("Failed to load configuration");
    assert_envelope_fields(&record, "ERROR");
    assert_eq!(
        record["error"],
        "Validation failed: rate_limit.requests must be greater than zero"
    );
    assert!(record["config_file"]
        .as_str()
        .unwrap()
        .contains("/etc/contact-service.toml"));
}
