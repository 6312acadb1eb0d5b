// ABOUTME: Core types and constants for the Agentforce MCP server
// ABOUTME: Foundation crate with the error taxonomy, tool protocol envelopes, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Agentforce Core
//!
//! Foundation crate providing shared types and constants for the Agentforce MCP
//! server. This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and the `ErrorKind` taxonomy
//! - **protocol**: Tool request/response envelopes, manifest types, stream events and identifiers
//! - **constants**: Tool names, wire strings, environment variable names and defaults

/// Unified error handling with the tool-level error taxonomy
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Tool protocol envelopes, manifest schema and stream wire types
pub mod protocol;
