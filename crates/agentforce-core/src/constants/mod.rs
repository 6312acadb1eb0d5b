// ABOUTME: Application constants organized by domain
// ABOUTME: Tool names, wire fields, environment variable names, remote endpoints and defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Wire strings and configuration names shared by the server, the reverse
//! proxy and their tests.

/// Tool names accepted by the dispatcher
pub mod tools {
    /// Create a new agent session
    pub const CREATE_SESSION: &str = "create_session";
    /// Send a message and wait for the full reply
    pub const SEND_MESSAGE: &str = "send_message";
    /// Send a message and stream the reply
    pub const SEND_MESSAGE_STREAM: &str = "send_message_stream";
    /// Poll the next event of a stream
    pub const GET_STREAM_MESSAGE: &str = "get_stream_message";
    /// Cancel an in-flight stream
    pub const CANCEL_STREAM: &str = "cancel_stream";
    /// End an agent session
    pub const END_SESSION: &str = "end_session";
}

/// JSON field names used in tool parameters and results
pub mod json_fields {
    /// Backend-assigned session identifier
    pub const SESSION_ID: &str = "sessionId";
    /// Message text
    pub const MESSAGE: &str = "message";
    /// Stream identifier (`<sessionId>-<sequenceId>`)
    pub const STREAM_ID: &str = "streamId";
    /// Boolean outcome flag
    pub const SUCCESS: &str = "success";
}

/// MCP manifest metadata
pub mod manifest {
    /// Manifest schema version
    pub const SCHEMA_VERSION: &str = "202206";
    /// Tool name advertised in the manifest
    pub const TOOL_NAME: &str = "agentforce";
    /// Tool description advertised in the manifest
    pub const TOOL_DESCRIPTION: &str = "Integrate with Salesforce Agentforce agents";
}

/// Human-readable messages carried by errors and stream events
pub mod messages {
    /// Stream terminated by `cancel_stream`
    pub const STREAM_CANCELLED: &str = "Stream cancelled by user";
    /// One SSE record could not be decoded
    pub const STREAM_CHUNK_FAILED: &str = "Error processing stream chunk";
    /// Outbound stream request failed before any data arrived
    pub const STREAM_ESTABLISH_FAILED: &str = "Error establishing stream";
    /// Stream could not be started at all
    pub const STREAM_INITIATE_FAILED: &str = "Failed to initiate streaming message to Agentforce";
    /// Token refresh failed
    pub const AUTH_FAILED: &str = "Failed to authenticate with Agentforce";
    /// Remote session creation failed
    pub const SESSION_CREATE_FAILED: &str = "Failed to create session with Agentforce";
    /// Remote session deletion failed
    pub const SESSION_END_FAILED: &str = "Failed to end session with Agentforce";
    /// Plain message send failed
    pub const MESSAGE_SEND_FAILED: &str = "Failed to send message to Agentforce";
    /// Fallback when a failure carries no message
    pub const UNKNOWN_ERROR: &str = "Unknown error occurred";
}

/// Remote Agentforce API paths, relative to the org base URL
pub mod endpoints {
    /// OAuth2 token endpoint
    pub const OAUTH_TOKEN: &str = "/services/oauth2/token";
    /// Session collection
    pub const SESSIONS: &str = "/agent-api/v1/sessions";
    /// Per-session messaging prefix
    pub const AGENT_SESSION: &str = "/services/v1/agent/session";
    /// SSE media type requested for streaming replies
    pub const EVENT_STREAM: &str = "text/event-stream";
}

/// Environment variable names
pub mod env_vars {
    /// Server HTTP port
    pub const PORT: &str = "PORT";
    /// OAuth client id
    pub const CLIENT_ID: &str = "AGENTFORCE_CLIENT_ID";
    /// OAuth client secret
    pub const CLIENT_SECRET: &str = "AGENTFORCE_CLIENT_SECRET";
    /// Salesforce org base URL
    pub const ORG_BASE_URL: &str = "AGENTFORCE_ORG_BASE_URL";
    /// Agent identifier passed at session creation
    pub const AGENT_ID: &str = "AGENTFORCE_AGENT_ID";
    /// Request timeout for non-streaming backend calls
    pub const HTTP_CLIENT_TIMEOUT_SECS: &str = "HTTP_CLIENT_TIMEOUT_SECS";
    /// Connect timeout for backend calls
    pub const HTTP_CLIENT_CONNECT_TIMEOUT_SECS: &str = "HTTP_CLIENT_CONNECT_TIMEOUT_SECS";
    /// Upstream server URL for the reverse proxy
    pub const SERVER_URL: &str = "SERVER_URL";
    /// Reverse proxy HTTP port
    pub const TOOL_PORT: &str = "TOOL_PORT";
}

/// Default values
pub mod defaults {
    /// Default server port
    pub const SERVER_PORT: u16 = 3000;
    /// Default reverse proxy port
    pub const TOOL_PORT: u16 = 3001;
    /// Default upstream URL for the reverse proxy
    pub const SERVER_URL: &str = "http://localhost:3000/api";
    /// Default request timeout for backend calls
    pub const HTTP_TIMEOUT_SECS: u64 = 60;
    /// Default connect timeout for backend calls
    pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Tokens expiring within this window are refreshed
    pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 300;
    /// Dotenv file read and written by the setup wizard
    pub const ENV_FILE: &str = ".env";
}

/// Service names for structured logging
pub mod service_names {
    /// Server binary
    pub const AGENTFORCE_MCP_SERVER: &str = "agentforce-mcp-server";
    /// Reverse proxy binary
    pub const AGENTFORCE_TOOL: &str = "agentforce-tool";
}
