// ABOUTME: Utility module organization
// ABOUTME: Shared helpers used across the server and proxy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// HTTP client construction with configured timeouts
pub mod http_client;

/// Listener binding
pub mod net;
