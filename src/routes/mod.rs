// ABOUTME: HTTP route assembly for the server
// ABOUTME: Combines the tool API and health routes with tracing and CORS middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP surface
//!
//! - `GET /api/manifest`
//! - `POST /api/execute`
//! - `GET /health`

/// Health check route
pub mod health;

/// Tool manifest and execution routes
pub mod mcp;

pub use health::HealthRoutes;
pub use mcp::McpRoutes;

use crate::mcp::ServerResources;
use axum::Router;
use http::{header, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Permissive CORS for browser-hosted tool clients
#[must_use]
pub fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}

/// Full server router
pub fn build_router(resources: ServerResources) -> Router {
    Router::new()
        .nest("/api", McpRoutes::routes(resources))
        .merge(HealthRoutes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(setup_cors())
}
