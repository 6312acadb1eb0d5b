// ABOUTME: OAuth2 client-credentials token cache for the Agentforce org
// ABOUTME: Reuses the cached bearer token until it is within the refresh margin of expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::TokenSource;
use crate::config::environment::AgentforceConfig;
use crate::constants::{defaults, endpoints, messages};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 7200;

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    instance_url: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// A bearer token and the instant it stops being valid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedToken {
    /// The access token string
    pub access_token: String,
    /// Instance URL reported by the org, if any
    pub instance_url: Option<String>,
    /// Token type (usually "Bearer")
    pub token_type: String,
    /// Expiration timestamp (UTC)
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Check if the token expires within the refresh margin
    #[must_use]
    pub fn will_expire_soon(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now + Duration::seconds(defaults::TOKEN_REFRESH_MARGIN_SECS)
    }
}

/// Client-credentials token cache
///
/// The lock is held across a refresh, so concurrent callers that find the
/// token stale wait for the single in-flight refresh and then share its result.
pub struct CredentialCache {
    client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl CredentialCache {
    /// Create a cache for the configured org
    #[must_use]
    pub fn new(config: &AgentforceConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            token_url: format!("{}{}", config.org_base_url, endpoints::OAUTH_TOKEN),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: Mutex::new(None),
        }
    }

    /// Snapshot of the cached token, if one has been fetched
    pub async fn cached(&self) -> Option<CachedToken> {
        self.token.lock().await.clone()
    }

    async fn fetch_token(&self) -> AppResult<CachedToken> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                warn!("Token request failed: {}", e);
                AppError::auth(messages::AUTH_FAILED).with_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Token endpoint rejected credentials: {}", body);
            return Err(AppError::auth(messages::AUTH_FAILED));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            warn!("Token response could not be parsed: {}", e);
            AppError::auth(messages::AUTH_FAILED).with_source(e)
        })?;

        let lifetime = token.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        Ok(CachedToken {
            access_token: token.access_token,
            instance_url: token.instance_url,
            token_type: token.token_type.unwrap_or_else(|| "Bearer".to_owned()),
            expires_at: Utc::now() + Duration::seconds(lifetime),
        })
    }
}

#[async_trait]
impl TokenSource for CredentialCache {
    async fn access_token(&self) -> AppResult<String> {
        let mut guard = self.token.lock().await;

        if let Some(token) = guard.as_ref() {
            if !token.will_expire_soon(Utc::now()) {
                debug!("Reusing cached Agentforce token");
                return Ok(token.access_token.clone());
            }
        }

        let token = self.fetch_token().await?;
        info!(expires_at = %token.expires_at, "Obtained Agentforce access token");
        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_expiring_in(secs: i64) -> CachedToken {
        CachedToken {
            access_token: "tok".into(),
            instance_url: None,
            token_type: "Bearer".into(),
            expires_at: Utc::now() + Duration::seconds(secs),
        }
    }

    #[test]
    fn test_token_outside_margin_is_fresh() {
        assert!(!token_expiring_in(3600).will_expire_soon(Utc::now()));
    }

    #[test]
    fn test_token_inside_margin_needs_refresh() {
        assert!(token_expiring_in(120).will_expire_soon(Utc::now()));
        assert!(token_expiring_in(-5).will_expire_soon(Utc::now()));
    }

    #[test]
    fn test_token_url_built_from_org() {
        let config = AgentforceConfig {
            org_base_url: "https://org.example.com".into(),
            ..AgentforceConfig::default()
        };
        let cache = CredentialCache::new(&config, reqwest::Client::new());
        assert_eq!(cache.token_url, "https://org.example.com/services/oauth2/token");
    }
}
