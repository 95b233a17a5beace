//! In-process fake helpdesk backend.
//!
//! Serves the helpdesk endpoints from an axum router bound to an ephemeral
//! port, with controllable responses:
//! - Advice per ticket, or a failure status for chosen tickets
//! - A canned validation event stream, delivered in small chunks
//! - Recorded request bodies and authorization headers

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use triage_core::config::BackendConfig;
use triage_core::HelpdeskClient;

pub use triage_core::testing::fixtures;

/// A request the fake backend received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct FakeState {
    failing: HashMap<String, u16>,
    advice_delay: Duration,
    stream_body: String,
    stream_chunk_size: usize,
    search_results: Value,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<RwLock<FakeState>>;

/// Fake backend running on `127.0.0.1:<ephemeral>`.
pub struct FakeBackend {
    pub base_url: String,
    state: Shared,
    server: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(RwLock::new(FakeState {
            stream_chunk_size: 7,
            search_results: json!({ "resultCount": 0, "result": [] }),
            ..Default::default()
        }));

        let router = Router::new()
            .route("/api/get-ticket-advice", post(advice))
            .route("/api/search-tickets", post(search))
            .route("/api/get-validation-tickets", post(validation))
            .route("/api/get-validation-tickets-stream", get(validation_stream))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Fake backend stopped");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            server,
        }
    }

    pub fn config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
            api_token: None,
        }
    }

    pub fn client(&self) -> HelpdeskClient {
        HelpdeskClient::new(&self.config()).expect("Failed to build client")
    }

    pub async fn fail_ticket(&self, ticket_id: &str, status: u16) {
        self.state
            .write()
            .await
            .failing
            .insert(ticket_id.to_string(), status);
    }

    pub async fn set_advice_delay(&self, delay: Duration) {
        self.state.write().await.advice_delay = delay;
    }

    pub async fn set_stream_body(&self, body: String) {
        self.state.write().await.stream_body = body;
    }

    pub async fn set_search_results(&self, results: Value) {
        self.state.write().await.search_results = results;
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.read().await.requests.clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record(state: &Shared, path: &str, headers: &HeaderMap, body: Value) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.write().await.requests.push(RecordedRequest {
        path: path.to_string(),
        body,
        authorization,
    });
}

async fn advice(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "/api/get-ticket-advice", &headers, body.clone()).await;

    let ticket_id = body
        .get("ticketId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let (delay, failure) = {
        let state = state.read().await;
        (state.advice_delay, state.failing.get(&ticket_id).copied())
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    if let Some(status) = failure {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "advice unavailable").into_response();
    }

    Json(fixtures::recommendation(&ticket_id, "Service Desk", "P3")).into_response()
}

async fn search(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "/api/search-tickets", &headers, body).await;
    let results = state.read().await.search_results.clone();
    Json(results).into_response()
}

async fn validation(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "/api/get-validation-tickets", &headers, body).await;
    let tickets = fixtures::validation_tickets(&["IN1", "IN2"]);
    Json(json!({ "count": tickets.len(), "tickets": tickets })).into_response()
}

async fn validation_stream(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "/api/get-validation-tickets-stream", &headers, Value::Null).await;

    let (body, chunk_size) = {
        let state = state.read().await;
        (state.stream_body.clone(), state.stream_chunk_size.max(1))
    };

    // Deliver in small chunks so events straddle chunk boundaries.
    let chunks: Vec<Result<Vec<u8>, std::io::Error>> = body
        .into_bytes()
        .chunks(chunk_size)
        .map(|c| Ok(c.to_vec()))
        .collect();

    (
        [(header::CONTENT_TYPE, "text/event-stream")],
        Body::from_stream(futures::stream::iter(chunks)),
    )
        .into_response()
}
