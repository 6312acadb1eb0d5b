// ABOUTME: Tool manifest describing the six agent tools and their parameter schemas
// ABOUTME: Served at /api/manifest so clients can discover tool names, inputs and outputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::environment::ToolMetadata;
use crate::constants::json_fields::{MESSAGE, SESSION_ID, STREAM_ID, SUCCESS};
use crate::constants::{manifest, tools};
use crate::protocol::{
    InputSchema, Manifest, ManifestMetadata, OutputSchema, PropertySchema, ToolDefinition,
};
use std::collections::HashMap;

/// `(name, type, description)`
type Property<'a> = (&'a str, &'a str, &'a str);

const SESSION_ID_PARAM: Property<'static> =
    (SESSION_ID, "string", "Session ID returned by create_session");
const MESSAGE_PARAM: Property<'static> = (MESSAGE, "string", "Message to send to the agent");
const STREAM_ID_PARAM: Property<'static> =
    (STREAM_ID, "string", "Stream ID returned by send_message_stream");
const SUCCESS_RESULT: Property<'static> = (SUCCESS, "boolean", "Whether the operation succeeded");

fn properties(props: &[Property<'_>]) -> HashMap<String, PropertySchema> {
    props
        .iter()
        .map(|(name, property_type, description)| {
            (
                (*name).to_owned(),
                PropertySchema {
                    property_type: (*property_type).to_owned(),
                    description: (*description).to_owned(),
                },
            )
        })
        .collect()
}

fn tool(name: &str, description: &str, inputs: &[Property<'_>], outputs: &[Property<'_>]) -> ToolDefinition {
    ToolDefinition {
        name: name.to_owned(),
        description: description.to_owned(),
        input_schema: InputSchema {
            schema_type: "object".into(),
            properties: properties(inputs),
            required: inputs.iter().map(|(name, _, _)| (*name).to_owned()).collect(),
        },
        output_schema: OutputSchema {
            schema_type: "object".into(),
            properties: properties(outputs),
        },
    }
}

/// Definitions of every supported tool
#[must_use]
pub fn get_tools() -> Vec<ToolDefinition> {
    vec![
        tool(
            tools::CREATE_SESSION,
            "Create a new session with an Agentforce agent",
            &[],
            &[(SESSION_ID, "string", "ID of the created session")],
        ),
        tool(
            tools::SEND_MESSAGE,
            "Send a message to an Agentforce agent and wait for the full reply",
            &[SESSION_ID_PARAM, MESSAGE_PARAM],
            &[(MESSAGE, "string", "Response from the agent")],
        ),
        tool(
            tools::SEND_MESSAGE_STREAM,
            "Send a message to an Agentforce agent and stream the reply",
            &[SESSION_ID_PARAM, MESSAGE_PARAM],
            &[(STREAM_ID, "string", "ID used to poll the streamed reply")],
        ),
        tool(
            tools::GET_STREAM_MESSAGE,
            "Get the next event of a streamed reply",
            &[STREAM_ID_PARAM],
            &[
                ("type", "string", "Event type: chunk, complete, error or waiting"),
                ("data", "string", "Text of a chunk or of the complete reply"),
                ("error", "string", "Error message for error events"),
            ],
        ),
        tool(
            tools::CANCEL_STREAM,
            "Cancel a streamed reply",
            &[STREAM_ID_PARAM],
            &[SUCCESS_RESULT],
        ),
        tool(
            tools::END_SESSION,
            "End a session with an Agentforce agent",
            &[SESSION_ID_PARAM],
            &[SUCCESS_RESULT],
        ),
    ]
}

/// Build the manifest advertised for `metadata`
#[must_use]
pub fn build_manifest(metadata: &ToolMetadata) -> Manifest {
    Manifest {
        schema_version: manifest::SCHEMA_VERSION.to_owned(),
        metadata: ManifestMetadata {
            name: metadata.name.clone(),
            description: metadata.description.clone(),
        },
        tools: get_tools(),
    }
}

/// Required parameter names of a tool, `None` for unknown tools
#[must_use]
pub fn required_parameters(tool_name: &str) -> Option<&'static [&'static str]> {
    const NONE: &[&str] = &[];
    const MESSAGE_PARAMS: &[&str] = &[SESSION_ID, MESSAGE];
    const STREAM_PARAMS: &[&str] = &[STREAM_ID];
    const SESSION_PARAMS: &[&str] = &[SESSION_ID];

    match tool_name {
        tools::CREATE_SESSION => Some(NONE),
        tools::SEND_MESSAGE | tools::SEND_MESSAGE_STREAM => Some(MESSAGE_PARAMS),
        tools::GET_STREAM_MESSAGE | tools::CANCEL_STREAM => Some(STREAM_PARAMS),
        tools::END_SESSION => Some(SESSION_PARAMS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_lists_all_tools() {
        let manifest = build_manifest(&ToolMetadata::default());
        assert_eq!(manifest.schema_version, "202206");
        assert_eq!(manifest.metadata.name, "agentforce");

        let names: Vec<&str> = manifest.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "create_session",
                "send_message",
                "send_message_stream",
                "get_stream_message",
                "cancel_stream",
                "end_session",
            ]
        );
    }

    #[test]
    fn test_required_parameters_match_schema() {
        for tool in get_tools() {
            let required = required_parameters(&tool.name).unwrap();
            assert_eq!(tool.input_schema.required, required, "{}", tool.name);
        }
        assert!(required_parameters("summon_dragon").is_none());
    }
}
