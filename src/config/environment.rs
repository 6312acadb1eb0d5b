// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, .env loading, and configuration validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use crate::constants::{defaults, env_vars, manifest};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::{info, warn};

/// Credentials and endpoint of the remote Agentforce org
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentforceConfig {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Salesforce org base URL, without trailing slash
    pub org_base_url: String,
    /// Agent identifier passed when creating sessions
    pub agent_id: String,
}

/// HTTP client timeouts for backend calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Request timeout for non-streaming calls
    pub timeout_secs: u64,
    /// Connect timeout for every call
    pub connect_timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
            connect_timeout_secs: defaults::HTTP_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Name and description advertised in the tool manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMetadata {
    /// Tool provider name
    pub name: String,
    /// Tool provider description
    pub description: String,
}

impl Default for ToolMetadata {
    fn default() -> Self {
        Self {
            name: manifest::TOOL_NAME.to_owned(),
            description: manifest::TOOL_DESCRIPTION.to_owned(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port for `/api` and `/health`
    pub http_port: u16,
    /// Remote Agentforce org
    pub agentforce: AgentforceConfig,
    /// Backend HTTP client settings
    pub http_client: HttpClientConfig,
    /// Manifest metadata
    pub tool: ToolMetadata,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::SERVER_PORT,
            agentforce: AgentforceConfig::default(),
            http_client: HttpClientConfig::default(),
            tool: ToolMetadata::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout variable is set but not a valid integer
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        Self::from_current_env()
    }

    /// Read configuration from the process environment without touching `.env`
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout variable is set but not a valid integer
    pub fn from_current_env() -> AppResult<Self> {
        Ok(Self {
            http_port: port_or(env_vars::PORT, defaults::SERVER_PORT),
            agentforce: AgentforceConfig {
                client_id: env_var_or(env_vars::CLIENT_ID, ""),
                client_secret: env_var_or(env_vars::CLIENT_SECRET, ""),
                org_base_url: env_var_or(env_vars::ORG_BASE_URL, "")
                    .trim_end_matches('/')
                    .to_owned(),
                agent_id: env_var_or(env_vars::AGENT_ID, ""),
            },
            http_client: HttpClientConfig {
                timeout_secs: parse_env_or(
                    env_vars::HTTP_CLIENT_TIMEOUT_SECS,
                    defaults::HTTP_TIMEOUT_SECS,
                )?,
                connect_timeout_secs: parse_env_or(
                    env_vars::HTTP_CLIENT_CONNECT_TIMEOUT_SECS,
                    defaults::HTTP_CONNECT_TIMEOUT_SECS,
                )?,
            },
            tool: ToolMetadata::default(),
        })
    }

    /// List every missing required setting
    ///
    /// An empty list means the server can start.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let required = [
            (env_vars::CLIENT_ID, &self.agentforce.client_id),
            (env_vars::CLIENT_SECRET, &self.agentforce.client_secret),
            (env_vars::ORG_BASE_URL, &self.agentforce.org_base_url),
            (env_vars::AGENT_ID, &self.agentforce.agent_id),
        ];

        required
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| format!("Missing {name} in environment variables"))
            .collect()
    }

    /// Human-readable configuration summary; secrets are not printed
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Agentforce MCP Server Configuration:\n\
             - HTTP Port: {}\n\
             - Org Base URL: {}\n\
             - Agent ID: {}\n\
             - Client Secret: {}\n\
             - HTTP Timeout: {}s (connect {}s)",
            self.http_port,
            self.agentforce.org_base_url,
            self.agentforce.agent_id,
            if self.agentforce.client_secret.is_empty() {
                "Missing"
            } else {
                "Configured"
            },
            self.http_client.timeout_secs,
            self.http_client.connect_timeout_secs,
        )
    }
}

/// Reverse-proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Upstream `/api` base URL
    pub server_url: String,
    /// Port the proxy listens on
    pub port: u16,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            server_url: defaults::SERVER_URL.to_owned(),
            port: defaults::TOOL_PORT,
        }
    }
}

impl ProxyConfig {
    /// Load proxy configuration from environment variables (and `.env`)
    #[must_use]
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }
        Self::from_current_env()
    }

    /// Read proxy configuration from the process environment
    #[must_use]
    pub fn from_current_env() -> Self {
        Self {
            server_url: env::var(env_vars::SERVER_URL)
                .ok()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| defaults::SERVER_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            port: port_or(env_vars::TOOL_PORT, defaults::TOOL_PORT),
        }
    }

    /// List every missing required setting
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        if self.server_url.is_empty() {
            vec![format!(
                "Missing {} in environment variables",
                env_vars::SERVER_URL
            )]
        } else {
            Vec::new()
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Ports fall back to the default when unset, zero or unparseable
fn port_or(key: &str, default: u16) -> u16 {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<u16>() {
            Ok(port) if port != 0 => port,
            _ => {
                warn!("Invalid {key} value '{raw}', using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn complete_config() -> ServerConfig {
        ServerConfig {
            agentforce: AgentforceConfig {
                client_id: "id".into(),
                client_secret: "secret".into(),
                org_base_url: "https://example.my.salesforce.com".into(),
                agent_id: "0Xx000000000001".into(),
            },
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_complete_config_validates() {
        assert!(complete_config().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_each_missing_variable() {
        let errors = ServerConfig::default().validate();
        assert_eq!(
            errors,
            vec![
                "Missing AGENTFORCE_CLIENT_ID in environment variables",
                "Missing AGENTFORCE_CLIENT_SECRET in environment variables",
                "Missing AGENTFORCE_ORG_BASE_URL in environment variables",
                "Missing AGENTFORCE_AGENT_ID in environment variables",
            ]
        );
    }

    #[test]
    fn test_summary_hides_secret() {
        let summary = complete_config().summary();
        assert!(summary.contains("Configured"));
        assert!(!summary.contains("secret"));
    }

    #[test]
    fn test_proxy_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.server_url, "http://localhost:3000/api");
        assert_eq!(config.port, 3001);
        assert!(config.validate().is_empty());
    }

    #[test]
    #[serial]
    fn test_from_current_env() {
        env::set_var(env_vars::PORT, "not-a-port");
        env::set_var(env_vars::ORG_BASE_URL, "https://org.example.com/");
        env::set_var(env_vars::HTTP_CLIENT_TIMEOUT_SECS, "15");

        let config = ServerConfig::from_current_env().unwrap();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.agentforce.org_base_url, "https://org.example.com");
        assert_eq!(config.http_client.timeout_secs, 15);
        assert_eq!(config.http_client.connect_timeout_secs, 10);

        env::set_var(env_vars::HTTP_CLIENT_TIMEOUT_SECS, "soon");
        let error = ServerConfig::from_current_env().unwrap_err();
        assert_eq!(error.kind, crate::errors::ErrorKind::ConfigError);

        env::remove_var(env_vars::PORT);
        env::remove_var(env_vars::ORG_BASE_URL);
        env::remove_var(env_vars::HTTP_CLIENT_TIMEOUT_SECS);
    }

    #[test]
    #[serial]
    fn test_proxy_from_current_env() {
        env::set_var(env_vars::SERVER_URL, "http://upstream:8080/api/");
        env::set_var(env_vars::TOOL_PORT, "4001");

        let config = ProxyConfig::from_current_env();
        assert_eq!(config.server_url, "http://upstream:8080/api");
        assert_eq!(config.port, 4001);

        env::remove_var(env_vars::SERVER_URL);
        env::remove_var(env_vars::TOOL_PORT);
    }
}
