// ABOUTME: Bearer token acquisition for calls to the Agentforce API
// ABOUTME: Defines the TokenSource seam and the client-credentials CredentialCache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication
//!
//! Every backend call carries `Authorization: Bearer <token>`. The token comes
//! from a [`TokenSource`]; production uses [`CredentialCache`], constructed once
//! at startup and shared behind an `Arc`.

/// OAuth2 client-credentials token cache
pub mod credentials;

pub use credentials::{CachedToken, CredentialCache};

use crate::errors::AppResult;
use async_trait::async_trait;

/// Supplies a currently-valid bearer token
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a token that is valid for at least the refresh margin
    ///
    /// # Errors
    ///
    /// Returns `AUTH_ERROR` when a fresh token cannot be obtained
    async fn access_token(&self) -> AppResult<String>;
}

/// Fixed token, for backends that need no refresh
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> AppResult<String> {
        Ok(self.0.clone())
    }
}
