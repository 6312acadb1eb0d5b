// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Test logging, a scriptable fake Agentforce backend and HTTP request helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use agentforce_mcp_server::agentforce::{AgentBackend, AgentReply, ByteStream};
use agentforce_mcp_server::config::environment::{AgentforceConfig, ServerConfig};
use agentforce_mcp_server::errors::{AppError, AppResult};
use agentforce_mcp_server::mcp::ServerResources;
use agentforce_mcp_server::routes::build_router;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::Router;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use http::{header, Method, Request};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tower::ServiceExt;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet test logging once per test binary
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// A message the fake backend received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub session_id: String,
    pub sequence_id: u64,
    pub message: String,
    pub streaming: bool,
}

/// Scriptable in-memory backend
#[derive(Default)]
pub struct FakeBackend {
    /// Raw SSE chunks returned by every streaming reply
    pub stream_chunks: Mutex<Vec<String>>,
    /// Keep streaming replies open after the scripted chunks
    pub hold_stream_open: AtomicBool,
    /// Fail stream establishment
    pub fail_stream_open: AtomicBool,
    /// Fail session creation and deletion
    pub fail_sessions: AtomicBool,
    /// Fail token resolution and plain sends with `AUTH_ERROR`
    pub fail_auth: AtomicBool,
    pub sessions_created: AtomicUsize,
    pub sessions_deleted: AtomicUsize,
    pub sent: Mutex<Vec<SentMessage>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_stream(chunks: &[&str]) -> Arc<Self> {
        let backend = Self::default();
        *backend.stream_chunks.lock().unwrap() = chunks.iter().map(|c| (*c).to_owned()).collect();
        Arc::new(backend)
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, session_id: &str, sequence_id: u64, message: &str, streaming: bool) {
        self.sent.lock().unwrap().push(SentMessage {
            session_id: session_id.to_owned(),
            sequence_id,
            message: message.to_owned(),
            streaming,
        });
    }
}

#[async_trait]
impl AgentBackend for FakeBackend {
    async fn create_session(&self, _session_key: &str) -> AppResult<String> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(AppError::session("Failed to create session with Agentforce"));
        }
        let n = self.sessions_created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("S{n}"))
    }

    async fn delete_session(&self, _session_id: &str) -> AppResult<()> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(AppError::session("Failed to end session with Agentforce"));
        }
        self.sessions_deleted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_message(
        &self,
        session_id: &str,
        sequence_id: u64,
        message: &str,
    ) -> AppResult<AgentReply> {
        self.access_token().await?;
        self.record(session_id, sequence_id, message, false);
        Ok(AgentReply {
            response_id: format!("R{sequence_id}"),
            message: format!("echo: {message}"),
        })
    }

    async fn access_token(&self) -> AppResult<String> {
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(AppError::auth("Failed to authenticate with Agentforce"));
        }
        Ok("fake-token".into())
    }

    async fn open_message_stream(
        &self,
        access_token: &str,
        session_id: &str,
        sequence_id: u64,
        message: &str,
    ) -> AppResult<ByteStream> {
        assert_eq!(access_token, "fake-token");
        self.record(session_id, sequence_id, message, true);
        if self.fail_stream_open.load(Ordering::SeqCst) {
            return Err(AppError::stream("Error establishing stream: HTTP 503"));
        }

        let chunks: Vec<AppResult<Bytes>> = self
            .stream_chunks
            .lock()
            .unwrap()
            .iter()
            .map(|chunk| Ok(Bytes::from(chunk.clone())))
            .collect();

        if self.hold_stream_open.load(Ordering::SeqCst) {
            Ok(Box::pin(stream::iter(chunks).chain(stream::pending())))
        } else {
            Ok(Box::pin(stream::iter(chunks)))
        }
    }
}

/// Complete configuration that validates
pub fn test_config() -> ServerConfig {
    ServerConfig {
        agentforce: AgentforceConfig {
            client_id: "test-client".into(),
            client_secret: "test-secret".into(),
            org_base_url: "http://127.0.0.1:9".into(),
            agent_id: "0XxTESTAGENT".into(),
        },
        ..ServerConfig::default()
    }
}

/// Router over a fake backend
pub fn test_router(backend: Arc<FakeBackend>) -> Router {
    init_test_logging();
    build_router(ServerResources::with_backend(test_config(), backend))
}

/// Send a request and return status plus JSON body
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<String>) -> (u16, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(Body::from(body.unwrap_or_default()))
        .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request");
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// `POST /api/execute` with `{tool, parameters}`
pub async fn execute(app: &Router, tool: &str, parameters: Value) -> (u16, Value) {
    let body = json!({ "tool": tool, "parameters": parameters }).to_string();
    send(app, Method::POST, "/api/execute", Some(body)).await
}

/// Poll `get_stream_message` until a terminal event, returning every event seen
pub async fn poll_until_terminal(app: &Router, stream_id: &str) -> Vec<Value> {
    let mut events = Vec::new();
    for _ in 0..200 {
        let (_, response) = execute(app, "get_stream_message", json!({ "streamId": stream_id })).await;
        let event = response["result"].clone();
        match event["type"].as_str() {
            Some("waiting") => tokio::time::sleep(Duration::from_millis(5)).await,
            Some("complete" | "error") => {
                events.push(event);
                return events;
            }
            _ => events.push(event),
        }
    }
    panic!("stream {stream_id} never reached a terminal event");
}
