// ABOUTME: Reverse-proxy front-end forwarding tool traffic to the Agentforce MCP server
// ABOUTME: Relays every request except /health upstream and reports failures as PROXY_ERROR
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Reverse Proxy
//!
//! `GET /health` is answered locally. Any other request is forwarded to
//! `{SERVER_URL}{path}` with the same method and, except for `GET`/`HEAD`, the
//! same JSON body. The upstream status and body are relayed unchanged.

use crate::config::environment::ProxyConfig;
use crate::constants::env_vars;
use crate::errors::{AppError, ErrorKind};
use crate::protocol::ToolResponse;
use crate::routes::{setup_cors, HealthRoutes};
use crate::utils::http_client::proxy_client;
use crate::utils::net::bind_listener;
use anyhow::Result;
use axum::body::Body;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Router;
use bytes::Bytes;
use http::{header, Method, Uri};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

#[derive(Clone)]
struct ProxyState {
    client: reqwest::Client,
    server_url: String,
}

/// Reverse-proxy routes
pub struct ProxyRoutes;

impl ProxyRoutes {
    /// `/health` plus a fallback that forwards everything else
    pub fn routes(config: &ProxyConfig) -> Router {
        let state = ProxyState {
            client: proxy_client(),
            server_url: config.server_url.clone(),
        };

        Router::new()
            .fallback(Self::forward)
            .with_state(state)
            .merge(HealthRoutes::routes())
            .layer(TraceLayer::new_for_http())
            .layer(setup_cors())
    }

    async fn forward(
        State(state): State<ProxyState>,
        method: Method,
        uri: Uri,
        body: Bytes,
    ) -> Response {
        let target = format!(
            "{}{}",
            state.server_url,
            uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str())
        );
        debug!(method = %method, target = %target, "Forwarding request");

        #[cfg(feature = "proxy-body-logging")]
        debug!(body = %String::from_utf8_lossy(&body), "Forwarded request body");

        match Self::relay(&state.client, method, &target, body).await {
            Ok(response) => response,
            Err(error) => {
                warn!(target = %target, "Proxy request failed: {}", error);
                ToolResponse::from(error).into_response()
            }
        }
    }

    async fn relay(
        client: &reqwest::Client,
        method: Method,
        target: &str,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let mut request = client
            .request(method.clone(), target)
            .header(header::CONTENT_TYPE, "application/json");
        if method != Method::GET && method != Method::HEAD {
            request = request.body(body);
        }

        let upstream = request
            .send()
            .await
            .map_err(|e| AppError::proxy(e.to_string()).with_source(e))?;
        let status = upstream.status();
        let payload = upstream
            .bytes()
            .await
            .map_err(|e| AppError::proxy(e.to_string()).with_source(e))?;

        #[cfg(feature = "proxy-body-logging")]
        debug!(status = %status, body = %String::from_utf8_lossy(&payload), "Upstream response");

        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload))
            .map_err(|e| AppError::new(ErrorKind::ProxyError, e.to_string()))
    }
}

/// Run the reverse proxy until the process is stopped
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails
pub async fn run(config: &ProxyConfig) -> Result<()> {
    let listener = bind_listener(config.port, env_vars::TOOL_PORT).await?;
    info!(
        port = config.port,
        upstream = %config.server_url,
        "Agentforce tool proxy listening"
    );
    axum::serve(listener, ProxyRoutes::routes(config)).await?;
    Ok(())
}
