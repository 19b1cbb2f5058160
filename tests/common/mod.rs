//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;

/// A request captured by the fake completion service.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    response: serde_json::Value,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// In-process stand-in for the hosted completion API.
pub struct FakeService {
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl FakeService {
    /// Start a service that answers every request with `status` and `response`.
    pub async fn start(status: StatusCode, response: serde_json::Value) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            status,
            response,
            captured: captured.clone(),
        };

        let app = Router::new()
            .route("/v1/chat/completions", post(handle_openai))
            .route("/v1/messages", post(handle_claude))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            captured,
        }
    }

    /// Start a service replying in the OpenAI dialect with `text`.
    pub async fn openai_reply(text: &str) -> Self {
        Self::start(
            StatusCode::OK,
            serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": text } }]
            }),
        )
        .await
    }

    /// Base URL for the OpenAI dialect (`{base}/v1`).
    pub fn openai_base_url(&self) -> String {
        format!("{}/v1", self.base_url)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }
}

fn record(state: &FakeState, path: &str, headers: HeaderMap, body: serde_json::Value) {
    state.captured.lock().unwrap().push(CapturedRequest {
        path: path.to_string(),
        headers,
        body,
    });
}

async fn handle_openai(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    record(&state, "/v1/chat/completions", headers, body);
    (state.status, Json(state.response.clone()))
}

async fn handle_claude(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    record(&state, "/v1/messages", headers, body);
    (state.status, Json(state.response.clone()))
}

/// Write an FAQ file into a temp dir and return both.
pub fn write_faq(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manual_faqs.json");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

pub const PAIRING_FAQ: &str =
    r#"[{"question":"How do I pair my phone?","answer":"Use Bluetooth settings."}]"#;
