// ABOUTME: Tests of the reverse-proxy front-end against a local upstream server
// ABOUTME: Covers local health, request forwarding, status relay and unreachable upstreams
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use agentforce_mcp_server::config::environment::ProxyConfig;
use agentforce_mcp_server::proxy::ProxyRoutes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use common::{init_test_logging, send};
use http::{Method, StatusCode, Uri};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A request as the upstream saw it
#[derive(Debug, Clone, PartialEq, Eq)]
struct Seen {
    method: Method,
    uri: String,
    body: String,
}

#[derive(Default)]
struct Upstream {
    seen: Mutex<Vec<Seen>>,
}

async fn record(
    State(upstream): State<Arc<Upstream>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    upstream.seen.lock().unwrap().push(Seen {
        method,
        uri: uri.to_string(),
        body,
    });
    (StatusCode::CREATED, Json(json!({"status": "success", "result": {"relayed": true}})))
        .into_response()
}

async fn broken() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"status": "error", "error": {"type": "EXECUTION_ERROR", "message": "boom"}})),
    )
        .into_response()
}

async fn spawn_upstream(upstream: Arc<Upstream>) -> String {
    let app = Router::new()
        .route("/api/broken", post(broken))
        .fallback(record)
        .with_state(upstream);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

/// Base URL of a port nothing listens on
async fn closed_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

fn proxy(server_url: String) -> Router {
    init_test_logging();
    ProxyRoutes::routes(&ProxyConfig {
        server_url,
        ..ProxyConfig::default()
    })
}

#[tokio::test]
async fn test_health_is_answered_locally() {
    let app = proxy(closed_upstream().await);
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_request_is_forwarded_with_method_path_query_and_body() {
    let upstream = Arc::new(Upstream::default());
    let app = proxy(spawn_upstream(upstream.clone()).await);

    let request = json!({"tool": "create_session", "parameters": {}}).to_string();
    let (status, body) =
        send(&app, Method::POST, "/execute?trace=1", Some(request.clone())).await;
    assert_eq!(status, 201);
    assert_eq!(body, json!({"status": "success", "result": {"relayed": true}}));

    let (status, _) = send(&app, Method::GET, "/manifest", None).await;
    assert_eq!(status, 201);

    let seen = upstream.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            Seen {
                method: Method::POST,
                uri: "/api/execute?trace=1".into(),
                body: request,
            },
            Seen {
                method: Method::GET,
                uri: "/api/manifest".into(),
                body: String::new(),
            },
        ]
    );
}

#[tokio::test]
async fn test_upstream_error_status_is_relayed() {
    let upstream = Arc::new(Upstream::default());
    let app = proxy(spawn_upstream(upstream.clone()).await);

    let (status, body) = send(&app, Method::POST, "/broken", Some("{}".into())).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"]["type"], "EXECUTION_ERROR");
    assert_eq!(body["error"]["message"], "boom");
    assert!(upstream.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_upstream_is_proxy_error() {
    let app = proxy(closed_upstream().await);

    let (status, body) = send(&app, Method::POST, "/execute", Some("{}".into())).await;
    assert_eq!(status, 500);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["type"], "PROXY_ERROR");
    assert!(body["error"]["message"].as_str().is_some_and(|m| !m.is_empty()));
}
