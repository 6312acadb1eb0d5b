// ABOUTME: HTTP client for the Agentforce agent API built on reqwest
// ABOUTME: Creates and deletes sessions and sends plain or streaming messages with bearer auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AgentBackend, AgentReply, ByteStream};
use crate::auth::TokenSource;
use crate::config::environment::{AgentforceConfig, HttpClientConfig};
use crate::constants::{endpoints, messages};
use crate::errors::{AppError, AppResult};
use crate::utils::http_client::{api_client, streaming_client};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest<'a> {
    agent_id: &'a str,
    session_key: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    session_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageRequest<'a> {
    sequence_id: u64,
    message: &'a str,
}

/// Agentforce API client
#[derive(Clone)]
pub struct AgentforceClient {
    api: Client,
    streaming: Client,
    base_url: Url,
    agent_id: String,
    tokens: Arc<dyn TokenSource>,
}

impl AgentforceClient {
    /// Create a client for the configured org
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_ERROR` if the org base URL is not an absolute URL
    pub fn new(
        config: &AgentforceConfig,
        http: &HttpClientConfig,
        tokens: Arc<dyn TokenSource>,
    ) -> AppResult<Self> {
        let base_url = Url::parse(&config.org_base_url).map_err(|e| {
            AppError::config(format!("Invalid org base URL '{}': {e}", config.org_base_url))
                .with_source(e)
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "Invalid org base URL '{}'",
                config.org_base_url
            )));
        }

        Ok(Self {
            api: api_client(http),
            streaming: streaming_client(http),
            base_url,
            agent_id: config.agent_id.clone(),
            tokens,
        })
    }

    /// Build `{base}{path}/{segments..}` with each segment percent-encoded
    fn endpoint(&self, path: &str, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::config("Org base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(path.trim_start_matches('/').split('/'))
            .extend(segments);
        Ok(url)
    }

    /// Authorize a request with a freshly resolved token, then send it
    async fn execute(
        &self,
        request: RequestBuilder,
        on_error: fn(String) -> AppError,
        failure: &str,
    ) -> AppResult<Response> {
        let token = self.tokens.access_token().await?;
        send(request.bearer_auth(token), on_error, failure).await
    }
}

/// Send a request, mapping transport errors and non-2xx statuses with `on_error`
async fn send(
    request: RequestBuilder,
    on_error: fn(String) -> AppError,
    failure: &str,
) -> AppResult<Response> {
    let response = request.send().await.map_err(|e| {
        warn!("{}: {}", failure, e);
        on_error(format!("{failure}: {e}")).with_source(e)
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = %status, "{}: {}", failure, body);
    Err(on_error(format!("{failure}: HTTP {status}")))
}

#[async_trait]
impl AgentBackend for AgentforceClient {
    async fn create_session(&self, session_key: &str) -> AppResult<String> {
        let url = self.endpoint(endpoints::SESSIONS, &[])?;
        let request = self.api.post(url).json(&CreateSessionRequest {
            agent_id: &self.agent_id,
            session_key,
        });

        let response = self
            .execute(request, AppError::session, messages::SESSION_CREATE_FAILED)
            .await?;
        let created: CreateSessionResponse = response.json().await.map_err(|e| {
            AppError::session(format!("{}: {e}", messages::SESSION_CREATE_FAILED)).with_source(e)
        })?;

        info!(session_id = %created.session_id, "Agentforce session created");
        Ok(created.session_id)
    }

    async fn delete_session(&self, session_id: &str) -> AppResult<()> {
        let url = self.endpoint(endpoints::SESSIONS, &[session_id])?;
        self.execute(
            self.api.delete(url),
            AppError::session,
            messages::SESSION_END_FAILED,
        )
        .await?;

        info!(session_id = %session_id, "Agentforce session deleted");
        Ok(())
    }

    async fn send_message(
        &self,
        session_id: &str,
        sequence_id: u64,
        message: &str,
    ) -> AppResult<AgentReply> {
        let url = self.endpoint(endpoints::AGENT_SESSION, &[session_id, "message"])?;
        let request = self.api.post(url).json(&MessageRequest {
            sequence_id,
            message,
        });

        let response = self
            .execute(request, AppError::message, messages::MESSAGE_SEND_FAILED)
            .await?;
        let reply: AgentReply = response.json().await.map_err(|e| {
            AppError::message(format!("{}: {e}", messages::MESSAGE_SEND_FAILED)).with_source(e)
        })?;

        debug!(session_id = %session_id, sequence_id, "Agentforce reply received");
        Ok(reply)
    }

    async fn access_token(&self) -> AppResult<String> {
        self.tokens.access_token().await
    }

    async fn open_message_stream(
        &self,
        access_token: &str,
        session_id: &str,
        sequence_id: u64,
        message: &str,
    ) -> AppResult<ByteStream> {
        let url = self.endpoint(endpoints::AGENT_SESSION, &[session_id, "message", "stream"])?;
        let request = self
            .streaming
            .post(url)
            .bearer_auth(access_token)
            .header(header::ACCEPT, endpoints::EVENT_STREAM)
            .json(&MessageRequest {
                sequence_id,
                message,
            });

        let response = send(request, AppError::stream, messages::STREAM_ESTABLISH_FAILED).await?;

        debug!(session_id = %session_id, sequence_id, "Agentforce stream established");
        Ok(Box::pin(response.bytes_stream().map_err(|e| {
            AppError::stream(e.to_string()).with_source(e)
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;

    fn client(base: &str) -> AgentforceClient {
        let config = AgentforceConfig {
            org_base_url: base.into(),
            agent_id: "agent".into(),
            ..AgentforceConfig::default()
        };
        AgentforceClient::new(
            &config,
            &HttpClientConfig::default(),
            Arc::new(StaticToken("t".into())),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let client = client("https://org.example.com");
        assert_eq!(
            client.endpoint(endpoints::SESSIONS, &["S1"]).unwrap().as_str(),
            "https://org.example.com/agent-api/v1/sessions/S1"
        );
        assert_eq!(
            client
                .endpoint(endpoints::AGENT_SESSION, &["S1", "message", "stream"])
                .unwrap()
                .as_str(),
            "https://org.example.com/services/v1/agent/session/S1/message/stream"
        );
    }

    #[test]
    fn test_endpoint_encodes_session_id() {
        let client = client("https://org.example.com");
        let url = client.endpoint(endpoints::SESSIONS, &["a/b"]).unwrap();
        assert_eq!(url.path(), "/agent-api/v1/sessions/a%2Fb");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = AgentforceConfig {
            org_base_url: "not a url".into(),
            ..AgentforceConfig::default()
        };
        let result = AgentforceClient::new(
            &config,
            &HttpClientConfig::default(),
            Arc::new(StaticToken("t".into())),
        );
        assert!(result.is_err());
    }
}
