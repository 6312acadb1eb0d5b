// ABOUTME: Tool protocol envelopes, manifest schema and stream wire types
// ABOUTME: Defines the request/response envelope, stream events and the stream identifier codec
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Protocol Types
//!
//! Type-safe definitions for everything that crosses the `/api` boundary:
//! the `{tool, parameters}` request, the `success`/`error` response envelope,
//! the manifest, and the shape of events handed out by `get_stream_message`.

use crate::errors::{AppError, ErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Incoming tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Tool name
    pub tool: String,
    /// Tool parameters (missing means empty)
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl ToolRequest {
    /// Build a request for `tool` with the given parameters
    pub fn new(tool: impl Into<String>, parameters: Value) -> Self {
        let parameters = match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            tool: tool.into(),
            parameters,
        }
    }
}

/// Envelope status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Tool ran to completion
    Success,
    /// Tool failed; see `error`
    Error,
}

/// Structured error carried by an error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Wire type drawn from the error taxonomy
    #[serde(rename = "type")]
    pub error_type: ErrorKind,
    /// Human-readable message
    pub message: String,
}

/// Uniform response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// `success` or `error`
    pub status: ResponseStatus,
    /// Tool result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error details on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ToolResponse {
    /// Wrap a successful result
    #[must_use]
    pub const fn success(result: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            result: Some(result),
            error: None,
        }
    }

    /// Wrap a failure
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            result: None,
            error: Some(ErrorBody {
                error_type: kind,
                message: message.into(),
            }),
        }
    }

    /// Whether this envelope reports success
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// HTTP status code for this envelope
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.error
            .as_ref()
            .map_or(200, |error| error.error_type.http_status())
    }
}

impl From<AppError> for ToolResponse {
    fn from(error: AppError) -> Self {
        Self::error(error.kind, error.message)
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for ToolResponse {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}

// ============================================================================
// Manifest
// ============================================================================

/// Tool manifest served at `/api/manifest`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest schema version
    pub schema_version: String,
    /// Tool metadata
    pub metadata: ManifestMetadata,
    /// Available tools
    pub tools: Vec<ToolDefinition>,
}

/// Name and description of the tool provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Provider name
    pub name: String,
    /// Provider description
    pub description: String,
}

/// One tool in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Parameter schema
    pub input_schema: InputSchema,
    /// Result schema
    pub output_schema: OutputSchema,
}

/// JSON schema of tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSchema {
    /// Always `object`
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Parameter properties
    pub properties: HashMap<String, PropertySchema>,
    /// Required parameter names
    pub required: Vec<String>,
}

/// JSON schema of tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Always `object`
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Result properties
    pub properties: HashMap<String, PropertySchema>,
}

/// A single typed, described property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON type name
    #[serde(rename = "type")]
    pub property_type: String,
    /// Description
    pub description: String,
}

// ============================================================================
// Streaming
// ============================================================================

/// One event in a stream's delivery queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A decoded piece of the response
    Chunk {
        /// Decoded text
        text: String,
    },
    /// The full concatenated response (terminal)
    Complete {
        /// Entire accumulated text
        text: String,
    },
    /// A failure (terminal when it ends the stream)
    Error {
        /// Error message
        message: String,
    },
}

impl StreamEvent {
    /// Partial response
    pub fn chunk(text: impl Into<String>) -> Self {
        Self::Chunk { text: text.into() }
    }

    /// Final response
    pub fn complete(text: impl Into<String>) -> Self {
        Self::Complete { text: text.into() }
    }

    /// Failure
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// `Complete` and `Error` end the stream for the poller
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

/// Wire shape returned by `get_stream_message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamMessage {
    /// Partial response
    Chunk {
        /// Decoded text
        data: String,
    },
    /// Full response
    Complete {
        /// Entire accumulated text
        data: String,
    },
    /// Failure
    Error {
        /// Error message
        error: String,
    },
    /// Nothing queued yet; poll again
    Waiting,
}

impl From<StreamEvent> for StreamMessage {
    fn from(event: StreamEvent) -> Self {
        match event {
            StreamEvent::Chunk { text } => Self::Chunk { data: text },
            StreamEvent::Complete { text } => Self::Complete { data: text },
            StreamEvent::Error { message } => Self::Error { error: message },
        }
    }
}

impl From<Option<StreamEvent>> for StreamMessage {
    fn from(event: Option<StreamEvent>) -> Self {
        event.map_or(Self::Waiting, Self::from)
    }
}

/// Identifier of one streaming exchange: `<sessionId>-<sequenceId>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamId {
    session_id: String,
    sequence_id: u64,
}

impl StreamId {
    /// Derive the stream identifier for a freshly incremented sequence value
    pub fn new(session_id: impl Into<String>, sequence_id: u64) -> Self {
        Self {
            session_id: session_id.into(),
            sequence_id,
        }
    }

    /// Session the stream belongs to
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Sequence value the stream was issued with
    #[must_use]
    pub const fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    /// Parse `<sessionId>-<sequenceId>`
    ///
    /// Splits on the first hyphen. Backend session ids may contain hyphens
    /// themselves, so when the remainder after the first hyphen is not an
    /// integer the split is retried on the last hyphen.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_PARAMETERS` if no split yields a non-empty session id
    /// followed by an unsigned integer.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let attempt = |split: Option<(&str, &str)>| {
            split.and_then(|(session, sequence)| {
                if session.is_empty() {
                    return None;
                }
                sequence.parse::<u64>().ok().map(|seq| Self::new(session, seq))
            })
        };

        attempt(raw.split_once('-'))
            .or_else(|| attempt(raw.rsplit_once('-')))
            .ok_or_else(|| AppError::invalid_parameters(format!("Invalid streamId: {raw}")))
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.session_id, self.sequence_id)
    }
}

impl FromStr for StreamId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stream_id_format_and_parse() {
        let id = StreamId::new("S1", 1);
        assert_eq!(id.to_string(), "S1-1");

        let parsed = StreamId::parse("S1-1").unwrap();
        assert_eq!(parsed.session_id(), "S1");
        assert_eq!(parsed.sequence_id(), 1);
    }

    #[test]
    fn test_stream_id_with_hyphenated_session() {
        let raw = "0Xx9-abc-def-12";
        let parsed = StreamId::parse(raw).unwrap();
        assert_eq!(parsed.session_id(), "0Xx9-abc-def");
        assert_eq!(parsed.sequence_id(), 12);
        assert_eq!(parsed.to_string(), raw);
    }

    #[test]
    fn test_stream_id_malformed() {
        for raw in ["", "S1", "S1-", "-3", "S1-x", "S1-1.5"] {
            let error = StreamId::parse(raw).unwrap_err();
            assert_eq!(error.kind, ErrorKind::InvalidParameters, "{raw}");
        }
    }

    #[test]
    fn test_stream_message_wire_shape() {
        let chunk = serde_json::to_value(StreamMessage::from(StreamEvent::chunk("Hi "))).unwrap();
        assert_eq!(chunk, json!({"type": "chunk", "data": "Hi "}));

        let error = serde_json::to_value(StreamMessage::from(StreamEvent::error("boom"))).unwrap();
        assert_eq!(error, json!({"type": "error", "error": "boom"}));

        let waiting = serde_json::to_value(StreamMessage::from(None)).unwrap();
        assert_eq!(waiting, json!({"type": "waiting"}));
    }

    #[test]
    fn test_envelope_shapes() {
        let ok = serde_json::to_value(ToolResponse::success(json!({"sessionId": "S1"}))).unwrap();
        assert_eq!(ok, json!({"status": "success", "result": {"sessionId": "S1"}}));

        let err = serde_json::to_value(ToolResponse::from(AppError::session_not_found())).unwrap();
        assert_eq!(
            err,
            json!({"status": "error", "error": {"type": "SESSION_ERROR", "message": "Session not found"}})
        );
    }

    #[test]
    fn test_request_without_parameters() {
        let request: ToolRequest = serde_json::from_value(json!({"tool": "create_session"})).unwrap();
        assert!(request.parameters.is_empty());
    }
}
