// ABOUTME: Tool API routes serving the manifest and executing tool requests
// ABOUTME: Translates HTTP bodies into tool requests and envelopes into HTTP responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::ErrorKind;
use crate::mcp::{ServerResources, ToolDispatcher};
use crate::protocol::{Manifest, ToolRequest, ToolResponse};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
struct McpState {
    dispatcher: ToolDispatcher,
    manifest: Arc<Manifest>,
}

/// Tool API routes, mounted under `/api`
pub struct McpRoutes;

impl McpRoutes {
    /// Create `/manifest` and `/execute`
    pub fn routes(resources: ServerResources) -> Router {
        let state = McpState {
            manifest: Arc::clone(&resources.manifest),
            dispatcher: ToolDispatcher::new(resources),
        };

        Router::new()
            .route("/manifest", get(Self::handle_manifest))
            .route("/execute", post(Self::handle_execute))
            .with_state(state)
    }

    async fn handle_manifest(State(state): State<McpState>) -> Json<Manifest> {
        Json(state.manifest.as_ref().clone())
    }

    /// Any body that is not a tool request is an `EXECUTION_ERROR` (HTTP 500)
    async fn handle_execute(State(state): State<McpState>, body: Bytes) -> ToolResponse {
        match serde_json::from_slice::<ToolRequest>(&body) {
            Ok(request) => state.dispatcher.dispatch(request).await,
            Err(e) => {
                warn!("Rejected malformed tool request: {}", e);
                ToolResponse::error(ErrorKind::ExecutionError, e.to_string())
            }
        }
    }
}
