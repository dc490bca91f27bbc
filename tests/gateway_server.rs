//! Full HTTP round trips against a live gateway on an ephemeral port.

#![cfg(unix)]

mod common;

use async_trait::async_trait;
use cligate::adapters::{
    AdapterDescriptor, Operation, OperationError, OperationOptions, OperationOutcome,
};
use cligate::server::AppState;
use cligate::{AssistantAdapter, AssistantRegistry, CopilotAdapter, GatewayConfig};
use common::write_echo_stub;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Chat-only adapter for exercising the unsupported-operation path.
struct EchoAdapter {
    descriptor: AdapterDescriptor,
}

impl EchoAdapter {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            descriptor: AdapterDescriptor {
                identifier: "echo".to_string(),
                display_name: "Echo (test)".to_string(),
                command: "echo".to_string(),
                capabilities: vec![Operation::Chat],
            },
        })
    }
}

#[async_trait]
impl AssistantAdapter for EchoAdapter {
    fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    async fn chat(
        &self,
        message: &str,
        _context: Option<&str>,
        _options: &OperationOptions,
    ) -> Result<OperationOutcome, OperationError> {
        Ok(OperationOutcome::success(
            message.to_string(),
            Duration::from_millis(1),
        ))
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// Start a gateway backed by the echo stub CLI; returns its base URL.
async fn spawn_gateway() -> (String, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let stub = write_echo_stub(dir.path());

    let mut config = GatewayConfig::default();
    config.workspace = dir.path().to_path_buf();
    config.copilot = common::stub_config(&stub);

    let mut registry = AssistantRegistry::new();
    registry.register(Arc::new(CopilotAdapter::new(
        config.copilot.clone(),
        config.workspace.clone(),
    )));
    registry.register(EchoAdapter::new());
    registry.set_default("copilot");

    let state = Arc::new(AppState {
        registry,
        config,
        started_at: Instant::now(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, cligate::server::router(state))
            .await
            .unwrap();
    });

    (format!("http://{addr}"), dir)
}

#[tokio::test]
async fn health_reports_available_assistants() {
    let (base, _dir) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let response = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    let available: Vec<&str> = body["available_assistants"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(available.contains(&"copilot"));
}

#[tokio::test]
async fn chat_round_trip() {
    let (base, _dir) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/chat"))
        .json(&json!({"message": "hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["content"], "OK");
    assert_eq!(body["assistant"], "copilot");
    assert_eq!(body["operation"], "chat");
    assert!(body["error_kind"].is_null());
    assert!(body["elapsed_ms"].is_u64());
}

#[tokio::test]
async fn modify_round_trip_preserves_code() {
    let (base, _dir) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/code/modify"))
        .json(&json!({
            "code": "print('x')",
            "instruction": "add a docstring",
            "language": "python"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["content"].as_str().unwrap().contains("print('x')"));
    assert_eq!(body["operation"], "modify_code");
}

#[tokio::test]
async fn unknown_assistant_is_a_404() {
    let (base, _dir) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/chat"))
        .json(&json!({"message": "hello", "assistant": "missing"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn unsupported_operation_is_a_400() {
    let (base, _dir) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/code/explain"))
        .json(&json!({"code": "print('x')", "assistant": "echo"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("explain_code"));
}

#[tokio::test]
async fn empty_payload_is_a_structured_failure_not_an_http_error() {
    let (base, _dir) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/chat"))
        .json(&json!({"message": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error_kind"], "invalid_payload");
    assert!(body["content"].is_null());
}

#[tokio::test]
async fn assistants_listing_includes_probe_results() {
    let (base, _dir) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/assistants"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let assistants = body["assistants"].as_array().unwrap();
    assert_eq!(assistants.len(), 2);
    // Registration order is preserved.
    assert_eq!(assistants[0]["identifier"], "copilot");
    assert_eq!(assistants[0]["display_name"], "GitHub Copilot CLI");
    assert_eq!(assistants[0]["available"], true);
    assert_eq!(assistants[1]["identifier"], "echo");
}
