// ABOUTME: Main library entry point for the Agentforce MCP server
// ABOUTME: Bridges a tool-invocation protocol to Salesforce Agentforce agents with SSE streaming
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Agentforce MCP Server
//!
//! Exposes a small tool protocol (`create_session`, `send_message`,
//! `send_message_stream`, `get_stream_message`, `cancel_stream`, `end_session`)
//! over HTTP and fulfils it by delegating to a remote Agentforce agent.
//!
//! ## Architecture
//!
//! - **Credential cache**: client-credentials bearer token, refreshed near expiry
//! - **Session registry**: backend session ids and their monotonic sequence counters
//! - **Stream coordinator**: SSE reassembly into a per-stream FIFO queue drained by polling
//! - **Dispatcher**: validates tool parameters and wraps results in a uniform envelope
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use agentforce_mcp_server::config::environment::ServerConfig;
//! use agentforce_mcp_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Agentforce MCP Server configured with port: {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Remote Agentforce API client and backend trait
pub mod agentforce;

/// Bearer token acquisition and caching
pub mod auth;

/// Environment-based configuration
pub mod config;

/// Production logging and structured output
pub mod logging;

/// Tool manifest, dispatcher and shared server resources
pub mod mcp;

/// Plain and streaming message delivery
pub mod messaging;

/// Reverse-proxy front-end in front of the server
pub mod proxy;

/// HTTP routes for the server
pub mod routes;

/// Session lifecycle and sequence bookkeeping
pub mod session;

/// Interactive `.env` setup wizard
pub mod setup;

/// SSE reassembly and poll-based stream delivery
pub mod streaming;

/// Utility functions and helpers
pub mod utils;

pub use agentforce_core::{constants, errors, protocol};
