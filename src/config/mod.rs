// ABOUTME: Configuration management module for server and reverse-proxy settings
// ABOUTME: Loads environment variables (with optional .env file) into typed configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the Agentforce MCP server
//!
//! - **Environment**: server, Agentforce and reverse-proxy configuration from environment variables

/// Environment and server configuration
pub mod environment;
