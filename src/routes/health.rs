// ABOUTME: Health check route for service monitoring
// ABOUTME: Reports liveness of the server and of the reverse proxy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes() -> axum::Router {
        use axum::{routing::get, Json, Router};

        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({ "status": "ok" }))
        }

        Router::new().route("/health", get(health_handler))
    }
}
