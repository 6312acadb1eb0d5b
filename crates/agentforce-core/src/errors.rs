// ABOUTME: Unified error type and error taxonomy for tool execution
// ABOUTME: Maps every failure to a stable wire type used in the error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every failure raised by the session, messaging and streaming services is an
//! [`AppError`] tagged with an [`ErrorKind`]. The dispatcher never lets an error
//! escape: it converts the kind into the `type` field of the error envelope.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error taxonomy exposed on the wire
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Credential refresh failed
    #[serde(rename = "AUTH_ERROR")]
    AuthError,
    /// Session not found, or remote session create/delete failed
    #[serde(rename = "SESSION_ERROR")]
    SessionError,
    /// Plain message send failed
    #[serde(rename = "MESSAGE_ERROR")]
    MessageError,
    /// Stream could not be initiated
    #[serde(rename = "STREAM_ERROR")]
    StreamError,
    /// Missing or malformed tool parameters
    #[serde(rename = "INVALID_PARAMETERS")]
    InvalidParameters,
    /// Unrecognized tool name
    #[serde(rename = "INVALID_TOOL")]
    InvalidTool,
    /// Uncaught or unexpected failure
    #[serde(rename = "EXECUTION_ERROR")]
    ExecutionError,
    /// Reverse proxy could not reach the upstream server
    #[serde(rename = "PROXY_ERROR")]
    ProxyError,
    /// Invalid or missing configuration at startup
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
}

impl ErrorKind {
    /// Stable wire string for this kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthError => "AUTH_ERROR",
            Self::SessionError => "SESSION_ERROR",
            Self::MessageError => "MESSAGE_ERROR",
            Self::StreamError => "STREAM_ERROR",
            Self::InvalidParameters => "INVALID_PARAMETERS",
            Self::InvalidTool => "INVALID_TOOL",
            Self::ExecutionError => "EXECUTION_ERROR",
            Self::ProxyError => "PROXY_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// HTTP status used when this kind is returned from the execute endpoint
    ///
    /// Tool-level failures are reported in-band with 200; only unexpected
    /// failures and proxy failures use 500.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::ExecutionError | Self::ProxyError | Self::ConfigError => 500,
            Self::AuthError
            | Self::SessionError
            | Self::MessageError
            | Self::StreamError
            | Self::InvalidParameters
            | Self::InvalidTool => 200,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error kind
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Credential refresh failed
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthError, message)
    }

    /// Session lookup or remote session lifecycle failure
    pub fn session(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionError, message)
    }

    /// Plain message send failure
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MessageError, message)
    }

    /// Stream initiation failure
    pub fn stream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StreamError, message)
    }

    /// Missing or malformed parameters
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameters, message)
    }

    /// Unknown tool name
    pub fn invalid_tool(tool: &str) -> Self {
        Self::new(
            ErrorKind::InvalidTool,
            format!("Tool {tool} is not supported"),
        )
    }

    /// Generic fallback for unexpected failures
    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExecutionError, message)
    }

    /// Upstream failure in the reverse proxy
    pub fn proxy(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProxyError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigError, message)
    }

    /// Session id unknown to the registry
    pub fn session_not_found() -> Self {
        Self::session("Session not found")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::execution(format!("Serialization failed: {error}")).with_source(error)
    }
}
