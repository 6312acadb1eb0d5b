// ABOUTME: Centralized resource container shared by the dispatcher and HTTP routes
// ABOUTME: Wires the credential cache, backend client, session registry and stream coordinator once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources Module
//!
//! Everything is constructed once at startup and cloned cheaply into handlers.
//! The credential cache in particular is a single instance shared through the
//! backend client rather than a global.

use super::schema::build_manifest;
use crate::agentforce::{AgentBackend, AgentforceClient};
use crate::auth::CredentialCache;
use crate::config::environment::ServerConfig;
use crate::errors::AppResult;
use crate::messaging::MessagingService;
use crate::protocol::Manifest;
use crate::session::SessionRegistry;
use crate::streaming::StreamCoordinator;
use crate::utils::http_client::api_client;
use std::sync::Arc;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Live sessions
    pub sessions: SessionRegistry,
    /// Plain and streaming message delivery
    pub messaging: MessagingService,
    /// Manifest served at `/api/manifest`
    pub manifest: Arc<Manifest>,
}

impl ServerResources {
    /// Build resources talking to the configured Agentforce org
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_ERROR` if the org base URL is invalid
    pub fn new(config: ServerConfig) -> AppResult<Self> {
        let tokens = Arc::new(CredentialCache::new(
            &config.agentforce,
            api_client(&config.http_client),
        ));
        let backend = AgentforceClient::new(&config.agentforce, &config.http_client, tokens)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Build resources over any backend
    #[must_use]
    pub fn with_backend(config: ServerConfig, backend: Arc<dyn AgentBackend>) -> Self {
        let sessions = SessionRegistry::new(Arc::clone(&backend));
        let messaging = MessagingService::new(backend, sessions.clone(), StreamCoordinator::new());
        let manifest = Arc::new(build_manifest(&config.tool));

        Self {
            config: Arc::new(config),
            sessions,
            messaging,
            manifest,
        }
    }
}
