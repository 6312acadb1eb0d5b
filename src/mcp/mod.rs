// ABOUTME: Tool protocol layer: manifest, dispatcher and shared server resources
// ABOUTME: Routes named tool invocations to the session, messaging and streaming services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Tool dispatch and parameter validation
pub mod dispatcher;

/// Shared server resources
pub mod resources;

/// Tool manifest construction
pub mod schema;

pub use dispatcher::ToolDispatcher;
pub use resources::ServerResources;
