// ABOUTME: Tool dispatcher validating parameters and routing invocations to services
// ABOUTME: Wraps every outcome in the success/error response envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Tool dispatcher
//!
//! No failure escapes [`ToolDispatcher::dispatch`]; every error becomes an
//! error envelope carrying its [`ErrorKind`](crate::errors::ErrorKind).

use super::resources::ServerResources;
use super::schema::required_parameters;
use crate::constants::json_fields::{MESSAGE, SESSION_ID, STREAM_ID, SUCCESS};
use crate::constants::tools;
use crate::errors::{AppError, AppResult};
use crate::protocol::{ToolRequest, ToolResponse};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// Routes tool requests to the services in [`ServerResources`]
#[derive(Clone)]
pub struct ToolDispatcher {
    resources: ServerResources,
}

impl ToolDispatcher {
    /// Create a dispatcher over shared resources
    #[must_use]
    pub const fn new(resources: ServerResources) -> Self {
        Self { resources }
    }

    /// Execute one tool request
    pub async fn dispatch(&self, request: ToolRequest) -> ToolResponse {
        debug!(tool = %request.tool, "Dispatching tool request");

        match self.execute(&request).await {
            Ok(result) => ToolResponse::success(result),
            Err(error) => {
                warn!(tool = %request.tool, error_type = %error.kind, "Tool failed: {}", error);
                ToolResponse::from(error)
            }
        }
    }

    async fn execute(&self, request: &ToolRequest) -> AppResult<Value> {
        let required = required_parameters(&request.tool)
            .ok_or_else(|| AppError::invalid_tool(&request.tool))?;
        validate_parameters(&request.parameters, required)?;

        let params = &request.parameters;
        let resources = &self.resources;

        match request.tool.as_str() {
            tools::CREATE_SESSION => {
                let session = resources.sessions.create_session().await?;
                Ok(json!({ SESSION_ID: session.session_id }))
            }
            tools::SEND_MESSAGE => {
                let reply = resources
                    .messaging
                    .send_message(string_param(params, SESSION_ID), string_param(params, MESSAGE))
                    .await?;
                Ok(json!({ MESSAGE: reply }))
            }
            tools::SEND_MESSAGE_STREAM => {
                let stream_id = resources
                    .messaging
                    .send_message_stream(string_param(params, SESSION_ID), string_param(params, MESSAGE))
                    .await?;
                Ok(json!({ STREAM_ID: stream_id.to_string() }))
            }
            tools::GET_STREAM_MESSAGE => {
                let message = resources
                    .messaging
                    .get_stream_message(string_param(params, STREAM_ID))?;
                Ok(serde_json::to_value(message)?)
            }
            tools::CANCEL_STREAM => {
                let success = resources
                    .messaging
                    .cancel_stream(string_param(params, STREAM_ID))?;
                Ok(json!({ SUCCESS: success }))
            }
            tools::END_SESSION => {
                let success = resources
                    .sessions
                    .end_session(string_param(params, SESSION_ID))
                    .await?;
                Ok(json!({ SUCCESS: success }))
            }
            other => Err(AppError::invalid_tool(other)),
        }
    }
}

/// Every required parameter must be a non-empty string
fn validate_parameters(params: &Map<String, Value>, required: &[&str]) -> AppResult<()> {
    let present = |name: &&str| {
        params
            .get(*name)
            .and_then(Value::as_str)
            .is_some_and(|value| !value.is_empty())
    };

    if required.iter().all(present) {
        return Ok(());
    }

    let verb = if required.len() == 1 { "is" } else { "are" };
    Err(AppError::invalid_parameters(format!(
        "{} {verb} required",
        required.join(" and ")
    )))
}

/// Validated string parameter; empty when absent
fn string_param<'a>(params: &'a Map<String, Value>, name: &str) -> &'a str {
    params.get(name).and_then(Value::as_str).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_validate_parameters_messages() {
        let error = validate_parameters(&params(json!({})), &[SESSION_ID]).unwrap_err();
        assert_eq!(error.message, "sessionId is required");

        let error =
            validate_parameters(&params(json!({"sessionId": "S1"})), &[SESSION_ID, MESSAGE])
                .unwrap_err();
        assert_eq!(error.message, "sessionId and message are required");
    }

    #[test]
    fn test_empty_and_non_string_parameters_rejected() {
        assert!(validate_parameters(&params(json!({"streamId": ""})), &[STREAM_ID]).is_err());
        assert!(validate_parameters(&params(json!({"streamId": 7})), &[STREAM_ID]).is_err());
        assert!(validate_parameters(&params(json!({"streamId": "S1-1"})), &[STREAM_ID]).is_ok());
    }
}
